//! Shader Code Generator
//!
//! Turns a texture channel mask into template defines and renders the
//! G-buffer template into the WGSL source of one shader variant.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use minijinja::Environment;
use serde::Serialize;
use xxhash_rust::xxh3::xxh3_128;

use crate::errors::{Result, TexelError};
use crate::resources::channels::TextureChannels;
use crate::resources::texture::TextureRole;

// ─── Shader Variant ───────────────────────────────────────────────────────────

/// A compiled program specialized for exactly one [`TextureChannels`] value.
///
/// Variants are created by a [`ShaderBackend`] and shared as
/// `Arc<ShaderVariant>` by every material whose mask matches.
#[derive(Debug)]
pub struct ShaderVariant {
    channels: TextureChannels,
    source_file: PathBuf,
    code: String,
    /// xxh3-128 of `code`.
    hash: u128,
}

impl ShaderVariant {
    #[must_use]
    pub fn new(channels: TextureChannels, source_file: impl Into<PathBuf>, code: String) -> Self {
        let hash = xxh3_128(code.as_bytes());
        Self {
            channels,
            source_file: source_file.into(),
            code,
            hash,
        }
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> TextureChannels {
        self.channels
    }

    #[inline]
    #[must_use]
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// Final program source.
    #[inline]
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[inline]
    #[must_use]
    pub fn source_hash(&self) -> u128 {
        self.hash
    }
}

// ─── Backend Seam ─────────────────────────────────────────────────────────────

/// Compiles one shader variant from a source file.
///
/// Implementations report rejected permutations as
/// [`TexelError::ShaderCompile`]; the registry passes them through untouched.
pub trait ShaderBackend: Send + Sync {
    fn compile(&self, source_file: &Path, channels: TextureChannels) -> Result<ShaderVariant>;
}

// ─── Template Defines ─────────────────────────────────────────────────────────

/// Template define toggled by a role's channel bit.
#[must_use]
pub fn define_name(role: TextureRole) -> &'static str {
    match role {
        TextureRole::Albedo => "HAS_ALBEDO_MAP",
        TextureRole::Roughness => "HAS_ROUGHNESS_MAP",
        TextureRole::Metallic => "HAS_METALLIC_MAP",
        TextureRole::Normal => "HAS_NORMAL_MAP",
        TextureRole::Height => "HAS_HEIGHT_MAP",
        TextureRole::Occlusion => "HAS_OCCLUSION_MAP",
        TextureRole::Emission => "HAS_EMISSION_MAP",
        TextureRole::Mask => "HAS_MASK_MAP",
        TextureRole::Unknown => "HAS_UNKNOWN_MAP",
    }
}

#[derive(Serialize)]
struct ShaderContext {
    #[serde(flatten)]
    defines: BTreeMap<&'static str, bool>,
    channel_bits: u8,
}

impl ShaderContext {
    fn new(channels: TextureChannels) -> Self {
        let defines = TextureRole::ALL
            .into_iter()
            .map(|role| (define_name(role), channels.has_role(role)))
            .collect();

        Self {
            defines,
            channel_bits: channels.bits(),
        }
    }
}

pub struct ShaderGenerator;

impl ShaderGenerator {
    /// Renders `template_name` with one boolean define per role.
    pub fn generate_shader(
        env: &Environment<'static>,
        template_name: &str,
        channels: TextureChannels,
    ) -> Result<String> {
        let compile_error = |e: minijinja::Error| TexelError::ShaderCompile {
            channels,
            message: e.to_string(),
        };

        let template = env.get_template(template_name).map_err(compile_error)?;
        let source = template
            .render(ShaderContext::new(channels))
            .map_err(compile_error)?;

        Ok(format!(
            "// === Auto-generated G-Buffer Variant {:#04x} ===\n{source}",
            channels.bits()
        ))
    }
}
