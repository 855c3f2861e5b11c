//! Shader variant pipeline
//!
//! - cache: mask → compiled variant registry (compile once per mask)
//! - shader_gen: variant type, backend seam and template defines
//! - shader_manager: minijinja template backend

pub mod cache;
pub mod shader_gen;
pub mod shader_manager;

pub use cache::ShaderVariantRegistry;
pub use shader_gen::{ShaderBackend, ShaderVariant};
pub use shader_manager::TemplateShaderBackend;
