//! Shader Template Backend
//!
//! Loads WGSL templates with the minijinja template engine and renders one
//! source per texture channel mask.
//!
//! Templates are resolved from the configured shader directory first, then
//! from the copies embedded in the binary, so a data directory can override
//! any bundled template.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use minijinja::{Environment, Error, ErrorKind, syntax::SyntaxConfig};
use rust_embed::RustEmbed;

use super::shader_gen::{ShaderBackend, ShaderGenerator, ShaderVariant};
use crate::errors::{Result, TexelError};
use crate::resources::channels::TextureChannels;

#[derive(RustEmbed)]
#[folder = "src/renderer/pipeline/shaders"]
struct ShaderAssets;

fn build_env(shader_root: PathBuf) -> Result<Environment<'static>> {
    let mut env = Environment::new();

    let syntax = SyntaxConfig::builder()
        .block_delimiters("{$", "$}")
        .variable_delimiters("{{", "}}")
        .line_statement_prefix("$$")
        .build()
        .map_err(|e| TexelError::InvalidContext(format!("shader template syntax: {e}")))?;

    env.set_syntax(syntax);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_undefined_behavior(minijinja::UndefinedBehavior::SemiStrict);

    env.set_loader(move |name| shader_loader(&shader_root, name));

    env.set_path_join_callback(|name, _parent| format!("chunks/{name}").into());

    Ok(env)
}

fn shader_loader(shader_root: &Path, name: &str) -> std::result::Result<Option<String>, Error> {
    let filename = if Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wgsl"))
    {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{name}.wgsl"))
    };

    let path = shader_root.join(filename.as_ref());
    if path.is_file() {
        return match std::fs::read_to_string(&path) {
            Ok(source) => Ok(Some(source)),
            Err(e) => Err(Error::new(
                ErrorKind::TemplateNotFound,
                format!("Failed to read file: {e}"),
            )),
        };
    }

    if let Some(file) = ShaderAssets::get(&filename)
        && let Ok(source) = std::str::from_utf8(file.data.as_ref())
    {
        return Ok(Some(source.to_string()));
    }

    Ok(None)
}

// ─── TemplateShaderBackend ────────────────────────────────────────────────────

/// [`ShaderBackend`] that renders minijinja WGSL templates.
///
/// A variant "fails to compile" when its template cannot be found, does not
/// parse, or fails to render.
pub struct TemplateShaderBackend {
    env: Environment<'static>,
    shader_root: PathBuf,
}

impl TemplateShaderBackend {
    /// Creates a backend that resolves templates under `shader_root`
    /// before falling back to the embedded set.
    pub fn new(shader_root: impl Into<PathBuf>) -> Result<Self> {
        let shader_root = shader_root.into();
        Ok(Self {
            env: build_env(shader_root.clone())?,
            shader_root,
        })
    }

    #[must_use]
    pub fn shader_root(&self) -> &Path {
        &self.shader_root
    }

    fn template_name(source_file: &Path) -> String {
        source_file.to_string_lossy().replace('\\', "/")
    }
}

impl ShaderBackend for TemplateShaderBackend {
    fn compile(&self, source_file: &Path, channels: TextureChannels) -> Result<ShaderVariant> {
        let template_name = Self::template_name(source_file);
        let source = ShaderGenerator::generate_shader(&self.env, &template_name, channels)?;

        log::trace!("Generated shader {template_name} for {channels:?}:\n{source}");

        Ok(ShaderVariant::new(channels, source_file, source))
    }
}

impl std::fmt::Debug for TemplateShaderBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateShaderBackend")
            .field("shader_root", &self.shader_root)
            .finish_non_exhaustive()
    }
}
