use std::path::Path;
use std::sync::Arc;

use crate::assets::storage::{ResourceCache, TextureCache};
use crate::errors::Result;
use crate::renderer::pipeline::{ShaderVariantRegistry, TemplateShaderBackend};
use crate::resources::material::Material;
use crate::resources::material_serializer::MaterialSerializer;
use crate::scene::world::WorldNotifier;
use crate::settings::ShadingSettings;

/// Context shared by every material: texture cache, shader variant
/// registry and world notifier.
///
/// Lightweight and cloned freely; each clone points at the same collaborators.
#[derive(Clone)]
pub struct AssetServer {
    pub textures: Arc<dyn TextureCache>,
    pub shaders: Arc<ShaderVariantRegistry>,
    pub world: Arc<dyn WorldNotifier>,
}

impl AssetServer {
    /// Wires a [`ResourceCache`] and a registry backed by the template
    /// shader backend rooted at the settings' shader directory.
    pub fn new(settings: &ShadingSettings, world: Arc<dyn WorldNotifier>) -> Result<Self> {
        let backend = TemplateShaderBackend::new(settings.shader_directory())?;
        let shaders = ShaderVariantRegistry::with_backend(
            Arc::new(backend),
            settings.gbuffer_shader.clone(),
        );

        log::info!(
            "Asset server ready (shaders: {}, source: {})",
            settings.shader_directory().display(),
            settings.gbuffer_shader.display()
        );

        Ok(Self::from_parts(Arc::new(ResourceCache::new()), Arc::new(shaders), world))
    }

    #[must_use]
    pub fn from_parts(
        textures: Arc<dyn TextureCache>,
        shaders: Arc<ShaderVariantRegistry>,
        world: Arc<dyn WorldNotifier>,
    ) -> Self {
        Self {
            textures,
            shaders,
            world,
        }
    }

    #[must_use]
    pub fn create_material(&self) -> Material {
        Material::new(self.clone())
    }

    pub fn load_material(&self, path: impl AsRef<Path>) -> Result<Material> {
        MaterialSerializer::load(path, self)
    }

    pub fn save_material(&self, material: &mut Material, path: impl AsRef<Path>) -> Result<()> {
        MaterialSerializer::save(material, path)
    }
}

impl std::fmt::Debug for AssetServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetServer")
            .field("shaders", &self.shaders)
            .finish_non_exhaustive()
    }
}
