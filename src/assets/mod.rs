pub mod server;
pub mod storage;

pub use server::AssetServer;
pub use storage::{ResourceCache, TextureCache};
