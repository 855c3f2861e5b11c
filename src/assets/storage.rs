use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::errors::Result;
use crate::resources::texture::Texture;

/// Texture cache collaborator used by materials.
///
/// The cache is the canonical owner of texture resources: materials always
/// keep the instance returned by [`TextureCache::cache`], so repeated loads
/// of the same file converge on one `Arc`.
pub trait TextureCache: Send + Sync {
    /// Resident texture with this resource name.
    ///
    /// Names are file stems and may collide; callers that know the source
    /// path must check it.
    fn get_by_name(&self, name: &str) -> Option<Arc<Texture>>;

    /// Loads (or returns the resident) texture for a file.
    fn load(&self, path: &Path) -> Result<Arc<Texture>>;

    /// Returns the canonical instance for `texture`, inserting it if no
    /// equivalent texture is resident.
    fn cache(&self, texture: Arc<Texture>) -> Arc<Texture>;
}

// Internal data structure, protected by a lock.
#[derive(Default)]
struct CacheInner {
    /// Canonical file textures.
    by_path: FxHashMap<PathBuf, Arc<Texture>>,
    /// Canonical path-less textures (generated or procedural).
    pathless: FxHashMap<String, Arc<Texture>>,
    /// First file texture cached under each name, for name lookups.
    by_name: FxHashMap<String, Arc<Texture>>,
}

/// Thread-safe [`TextureCache`], deduplicating by source path (or by name
/// for textures without one).
#[derive(Default)]
pub struct ResourceCache {
    inner: RwLock<CacheInner>,
}

impl ResourceCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// [Read] Resident texture loaded from `path`.
    pub fn get_by_path(&self, path: &Path) -> Option<Arc<Texture>> {
        self.inner.read().by_path.get(path).cloned()
    }

    /// Number of resident textures.
    pub fn len(&self) -> usize {
        let guard = self.inner.read();
        guard.by_path.len() + guard.pathless.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TextureCache for ResourceCache {
    fn get_by_name(&self, name: &str) -> Option<Arc<Texture>> {
        let guard = self.inner.read();
        guard
            .pathless
            .get(name)
            .or_else(|| guard.by_name.get(name))
            .cloned()
    }

    fn load(&self, path: &Path) -> Result<Arc<Texture>> {
        if let Some(texture) = self.get_by_path(path) {
            log::debug!("Texture '{}' already resident", path.display());
            return Ok(texture);
        }

        // Header only; pixel upload belongs to the renderer.
        let (width, height) = image::image_dimensions(path)?;
        log::debug!("Loaded texture '{}' ({width}x{height})", path.display());

        Ok(self.cache(Arc::new(Texture::from_file(path, width, height))))
    }

    fn cache(&self, texture: Arc<Texture>) -> Arc<Texture> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let Some(path) = texture.path() else {
            // Path-less textures only ever match other path-less textures.
            return Arc::clone(
                inner
                    .pathless
                    .entry(texture.name().to_string())
                    .or_insert(texture),
            );
        };

        if let Some(existing) = inner.by_path.get(path) {
            return Arc::clone(existing);
        }

        inner.by_path.insert(path.to_path_buf(), Arc::clone(&texture));
        inner
            .by_name
            .entry(texture.name().to_string())
            .or_insert_with(|| Arc::clone(&texture));

        texture
    }
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("textures", &self.len())
            .finish()
    }
}
