//! Layered material model
//!
//! A [`LayeredMaterial`] is a named set of independently toggled shading layers.
//! Each active layer has one or more inputs, and each input is bound to an
//! [`InputExpression`]. The layer mask is derived from the bound inputs, so a
//! layer bit is set exactly when at least one of its inputs is bound.

use std::collections::BTreeMap;

use bitflags::bitflags;

use super::input::InputExpression;

bitflags! {
    /// Shading layers a material can enable
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaterialLayers: u32 {
        /// Light emitted by the surface
        const EMISSION = 1 << 0;
        /// Transmission through the surface
        const REFRACTION = 1 << 1;
        /// Specular reflection
        const REFLECTION = 1 << 2;
        /// Perturbed shading normal (normal/bump map)
        const SHADING_NORMAL = 1 << 3;
        /// Diffuse reflection
        const DIFFUSE = 1 << 4;
    }
}

impl MaterialLayers {
    /// Input-name namespace owned by a single layer
    pub fn namespace(self) -> Option<&'static str> {
        const NAMESPACES: [(MaterialLayers, &str); 5] = [
            (MaterialLayers::EMISSION, "emission"),
            (MaterialLayers::REFRACTION, "refraction"),
            (MaterialLayers::REFLECTION, "reflection"),
            (MaterialLayers::SHADING_NORMAL, "shading_normal"),
            (MaterialLayers::DIFFUSE, "diffuse"),
        ];
        NAMESPACES
            .iter()
            .find(|(layer, _)| *layer == self)
            .map(|(_, namespace)| *namespace)
    }
}

/// Named material inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaterialInput {
    /// `emission.color`
    EmissionColor,
    /// `refraction.ior`
    RefractionIor,
    /// `refraction.roughness`
    RefractionRoughness,
    /// `refraction.color`
    RefractionColor,
    /// `reflection.ior`
    ReflectionIor,
    /// `reflection.roughness`
    ReflectionRoughness,
    /// `reflection.metalness`
    ReflectionMetalness,
    /// `reflection.color`
    ReflectionColor,
    /// `shading_normal`
    ShadingNormal,
    /// `diffuse.color`
    DiffuseColor,
}

impl MaterialInput {
    /// Every input, in declaration order
    pub const ALL: [MaterialInput; 10] = [
        Self::EmissionColor,
        Self::RefractionIor,
        Self::RefractionRoughness,
        Self::RefractionColor,
        Self::ReflectionIor,
        Self::ReflectionRoughness,
        Self::ReflectionMetalness,
        Self::ReflectionColor,
        Self::ShadingNormal,
        Self::DiffuseColor,
    ];

    /// Semantic name of the input
    pub fn name(self) -> &'static str {
        match self {
            Self::EmissionColor => "emission.color",
            Self::RefractionIor => "refraction.ior",
            Self::RefractionRoughness => "refraction.roughness",
            Self::RefractionColor => "refraction.color",
            Self::ReflectionIor => "reflection.ior",
            Self::ReflectionRoughness => "reflection.roughness",
            Self::ReflectionMetalness => "reflection.metalness",
            Self::ReflectionColor => "reflection.color",
            Self::ShadingNormal => "shading_normal",
            Self::DiffuseColor => "diffuse.color",
        }
    }

    /// Layer the input belongs to
    pub fn layer(self) -> MaterialLayers {
        match self {
            Self::EmissionColor => MaterialLayers::EMISSION,
            Self::RefractionIor | Self::RefractionRoughness | Self::RefractionColor => {
                MaterialLayers::REFRACTION
            }
            Self::ReflectionIor
            | Self::ReflectionRoughness
            | Self::ReflectionMetalness
            | Self::ReflectionColor => MaterialLayers::REFLECTION,
            Self::ShadingNormal => MaterialLayers::SHADING_NORMAL,
            Self::DiffuseColor => MaterialLayers::DIFFUSE,
        }
    }

    /// Look an input up by its semantic name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|input| input.name() == name)
    }
}

/// Composed material, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredMaterial {
    name: String,
    layers: MaterialLayers,
    inputs: BTreeMap<MaterialInput, InputExpression>,
}

impl LayeredMaterial {
    /// Start building a material
    pub fn builder(name: impl Into<String>) -> LayeredMaterialBuilder {
        LayeredMaterialBuilder::new(name)
    }

    /// Material name (the cache key of the import session)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active layers
    pub fn layers(&self) -> MaterialLayers {
        self.layers
    }

    /// Whether the emission layer is active
    pub fn has_emission(&self) -> bool {
        self.layers.contains(MaterialLayers::EMISSION)
    }

    /// Expression bound to `input`
    pub fn input(&self, input: MaterialInput) -> Option<&InputExpression> {
        self.inputs.get(&input)
    }

    /// Expression bound to the input with semantic name `name`
    pub fn input_by_name(&self, name: &str) -> Option<&InputExpression> {
        MaterialInput::from_name(name).and_then(|input| self.input(input))
    }

    /// All bindings, ordered by input
    pub fn inputs(&self) -> impl Iterator<Item = (MaterialInput, &InputExpression)> {
        self.inputs.iter().map(|(input, expr)| (*input, expr))
    }
}

/// Builder for [`LayeredMaterial`]
///
/// Binding an input enables its layer; there is no other way to set a layer bit.
#[derive(Debug, Clone)]
pub struct LayeredMaterialBuilder {
    name: String,
    layers: MaterialLayers,
    inputs: BTreeMap<MaterialInput, InputExpression>,
}

impl LayeredMaterialBuilder {
    /// Create an empty builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: MaterialLayers::empty(),
            inputs: BTreeMap::new(),
        }
    }

    /// Bind an input, replacing any earlier binding of the same input
    pub fn set_input(&mut self, input: MaterialInput, value: InputExpression) -> &mut Self {
        self.layers |= input.layer();
        self.inputs.insert(input, value);
        self
    }

    /// Layers enabled so far
    pub fn layers(&self) -> MaterialLayers {
        self.layers
    }

    /// Finish the material
    pub fn build(self) -> LayeredMaterial {
        LayeredMaterial {
            name: self.name,
            layers: self.layers,
            inputs: self.inputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_every_input_lives_in_its_layer_namespace() {
        for input in MaterialInput::ALL {
            let namespace = input.layer().namespace().unwrap();
            assert!(input.name().starts_with(namespace), "{} not in {}", input.name(), namespace);
            assert_eq!(MaterialInput::from_name(input.name()), Some(input));
        }
    }

    #[test]
    fn test_builder_derives_layer_mask() {
        let mut builder = LayeredMaterial::builder("Glass");
        builder
            .set_input(MaterialInput::RefractionIor, InputExpression::constant_float(1.5))
            .set_input(MaterialInput::DiffuseColor, InputExpression::constant_float3(Vec3::zeros()));
        let material = builder.build();

        assert_eq!(material.name(), "Glass");
        assert_eq!(material.layers(), MaterialLayers::REFRACTION | MaterialLayers::DIFFUSE);
        assert!(!material.has_emission());
        assert_eq!(
            material.input_by_name("refraction.ior"),
            Some(&InputExpression::ConstantFloat(1.5))
        );
        assert!(material.input_by_name("refraction.color").is_none());
        assert!(material.input_by_name("bogus").is_none());
    }

    #[test]
    fn test_rebinding_replaces_value() {
        let mut builder = LayeredMaterialBuilder::new("M");
        builder.set_input(MaterialInput::DiffuseColor, InputExpression::constant_float(0.0));
        builder.set_input(MaterialInput::DiffuseColor, InputExpression::constant_float(1.0));
        let material = builder.build();
        assert_eq!(material.inputs().count(), 1);
        assert_eq!(
            material.input(MaterialInput::DiffuseColor),
            Some(&InputExpression::ConstantFloat(1.0))
        );
    }

    #[test]
    fn test_namespace_of_combined_mask_is_none() {
        assert!((MaterialLayers::DIFFUSE | MaterialLayers::EMISSION).namespace().is_none());
    }
}
