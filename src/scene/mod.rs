//! Scene-side collaborators of the material system:
//! - World: dirty flag for opaque/transparent render bucketing

pub mod world;

pub use world::{World, WorldNotifier};
