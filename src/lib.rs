#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod assets;
pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod settings;

pub use assets::{AssetServer, ResourceCache, TextureCache};
pub use errors::{Result, TexelError};
pub use renderer::{
    OptionValue, RenderFlags, RenderTargetDebug, RendererOptions, ShaderBackend, ShaderVariant,
    ShaderVariantRegistry, TemplateShaderBackend, Tonemapping,
};
pub use resources::{Material, MaterialSerializer, Texture, TextureChannels, TextureRole};
pub use scene::{World, WorldNotifier};
pub use settings::ShadingSettings;
