//! Material translation: layer composition and per-import deduplication

pub mod material_cache;
pub mod material_composer;

pub use material_cache::MaterialCache;
pub use material_composer::MaterialComposer;
