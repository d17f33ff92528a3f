//! Name-keyed cache of composed materials
//!
//! One cache lives for exactly one import call. Materials are keyed by their
//! source name, so two foreign records sharing a name resolve to the same
//! instance even when their properties differ.

use std::collections::HashMap;
use std::sync::Arc;

use crate::render::LayeredMaterial;

/// Cache of composed materials for one import session
#[derive(Debug, Default)]
pub struct MaterialCache {
    materials: HashMap<String, Arc<LayeredMaterial>>,
}

impl MaterialCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached material for `name`, composing it with `create` on a miss
    ///
    /// A failing `create` leaves the cache untouched.
    pub fn get_or_create<E, F>(&mut self, name: &str, create: F) -> Result<Arc<LayeredMaterial>, E>
    where
        F: FnOnce() -> Result<LayeredMaterial, E>,
    {
        if let Some(material) = self.materials.get(name) {
            log::debug!("Material cache hit: '{}'", name);
            return Ok(Arc::clone(material));
        }

        let material = Arc::new(create()?);
        self.materials.insert(name.to_string(), Arc::clone(&material));
        Ok(material)
    }

    /// Number of cached materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::{InputExpression, MaterialInput};

    fn diffuse(name: &str, color: Vec3) -> LayeredMaterial {
        let mut builder = LayeredMaterial::builder(name);
        builder.set_input(MaterialInput::DiffuseColor, InputExpression::constant_float3(color));
        builder.build()
    }

    #[test]
    fn test_get_or_create_composes_once() {
        let mut cache = MaterialCache::new();
        let mut calls = 0;

        let first = cache
            .get_or_create::<(), _>("Wood", || {
                calls += 1;
                Ok(diffuse("Wood", Vec3::x()))
            })
            .unwrap();
        let second = cache
            .get_or_create::<(), _>("Wood", || {
                calls += 1;
                Ok(diffuse("Wood", Vec3::y()))
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_name_collision_collapses_to_first() {
        let mut cache = MaterialCache::new();
        let red = cache
            .get_or_create::<(), _>("Shared", || Ok(diffuse("Shared", Vec3::x())))
            .unwrap();
        let blue = cache
            .get_or_create::<(), _>("Shared", || Ok(diffuse("Shared", Vec3::z())))
            .unwrap();

        assert!(Arc::ptr_eq(&red, &blue));
        assert_eq!(
            blue.input(MaterialInput::DiffuseColor),
            Some(&InputExpression::ConstantFloat3(Vec3::x()))
        );
    }

    #[test]
    fn test_failed_creation_is_not_cached() {
        let mut cache = MaterialCache::new();
        let result = cache.get_or_create("Broken", || Err("no texture"));
        assert_eq!(result.unwrap_err(), "no texture");
        assert!(cache.is_empty());

        let mut calls = 0;
        cache
            .get_or_create::<&str, _>("Broken", || {
                calls += 1;
                Ok(diffuse("Broken", Vec3::x()))
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }
}
