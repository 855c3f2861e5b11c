//! Renderer-side state consumed by materials and the editor.
//!
//! - [`pipeline`]: shader variant resolution and compilation
//! - [`options`]: render feature flags and tunable option values

pub mod options;
pub mod pipeline;

pub use options::{OptionValue, RenderFlags, RenderTargetDebug, RendererOptions, Tonemapping};
pub use pipeline::{ShaderBackend, ShaderVariant, ShaderVariantRegistry, TemplateShaderBackend};
