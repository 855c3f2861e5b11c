//! Core material-side resource definitions, independent of the GPU:
//! - TextureRole / Texture: texture roles and texture identities
//! - TextureChannels: per-material texture presence mask
//! - Material: slot table, multipliers and bound shader variant
//! - MaterialSerializer: JSON material documents
//! - ChangeTracker: version counters polled by the renderer

pub mod channels;
pub mod material;
pub mod material_serializer;
pub mod texture;
pub mod version_tracker;

pub use channels::{TextureChannels, TextureSlots, derive_mask};
pub use material::Material;
pub use material_serializer::MaterialSerializer;
pub use texture::{Texture, TextureRole};
pub use version_tracker::ChangeTracker;
