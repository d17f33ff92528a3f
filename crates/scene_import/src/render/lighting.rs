//! Scene lights

use crate::foundation::math::Vec3;

/// Direction of the placeholder light added to every imported scene
pub const DEFAULT_LIGHT_DIRECTION: [f32; 3] = [0.1, -1.0, -0.1];

/// Radiance of the placeholder light added to every imported scene
pub const DEFAULT_LIGHT_RADIANCE: [f32; 3] = [1.0, 1.0, 1.0];

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Infinitely distant light (like sunlight)
    Directional {
        /// Direction the light travels in, stored as given
        direction: Vec3,
        /// Emitted radiance
        radiance: Vec3,
    },
}

impl Light {
    /// Create a directional light
    pub fn directional(direction: Vec3, radiance: Vec3) -> Self {
        Self::Directional { direction, radiance }
    }

    /// The fixed directional light the importer appends to each scene
    pub fn import_default() -> Self {
        Self::directional(
            Vec3::from(DEFAULT_LIGHT_DIRECTION),
            Vec3::from(DEFAULT_LIGHT_RADIANCE),
        )
    }
}
