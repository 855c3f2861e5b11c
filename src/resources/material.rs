//! Material
//!
//! A [`Material`] owns a texture slot table, per-role multipliers, an albedo
//! color and UV transform, plus a shared handle to the shader variant that
//! matches its current [`TextureChannels`] mask.
//!
//! # Slot Protocol
//!
//! Every slot mutation goes through [`Material::set_texture_slot`], which
//! updates the table, the mask and the multiplier together, then calls
//! [`Material::refresh_shader`] to restore
//! `material.shader() == registry.resolve(material.channels())`.
//!
//! ```rust,ignore
//! let mut material = assets.create_material();
//! let albedo = assets.textures.load(Path::new("bricks.png"))?;
//! material.set_texture_slot(TextureRole::Albedo, Some(albedo))?;
//! assert!(material.channels().has_role(TextureRole::Albedo));
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Vec2, Vec4};
use uuid::Uuid;

use crate::assets::AssetServer;
use crate::errors::Result;
use crate::renderer::pipeline::ShaderVariant;
use crate::resources::channels::{TextureChannels, TextureSlots, derive_mask};
use crate::resources::texture::{Texture, TextureRole};
use crate::resources::version_tracker::ChangeTracker;

pub const DEFAULT_ROUGHNESS_MULTIPLIER: f32 = 0.9;

pub struct Material {
    pub uuid: Uuid,
    file_path: Option<PathBuf>,

    color_albedo: Vec4,
    uv_tiling: Vec2,
    uv_offset: Vec2,
    is_editable: bool,

    textures: TextureSlots,
    channels: TextureChannels,
    multipliers: [f32; TextureRole::COUNT],

    shader: Option<Arc<ShaderVariant>>,
    tracker: ChangeTracker,
    assets: AssetServer,
}

impl Material {
    /// Creates an untextured material bound to the base (empty mask) variant.
    ///
    /// A failure to compile the base variant is logged and leaves
    /// [`Material::shader`] empty; [`Material::refresh_shader`] retries.
    #[must_use]
    pub fn new(assets: AssetServer) -> Self {
        let mut material = Self::unresolved(assets);
        if let Err(e) = material.refresh_shader() {
            log::error!("Material {} has no shader: {e}", material.uuid);
        }
        material
    }

    /// Material with default fields and no shader resolved yet.
    pub(crate) fn unresolved(assets: AssetServer) -> Self {
        let mut multipliers = [0.0; TextureRole::COUNT];
        if let Some(index) = TextureRole::Roughness.index() {
            multipliers[index] = DEFAULT_ROUGHNESS_MULTIPLIER;
        }

        Self {
            uuid: Uuid::new_v4(),
            file_path: None,
            color_albedo: Vec4::ONE,
            uv_tiling: Vec2::ONE,
            uv_offset: Vec2::ZERO,
            is_editable: true,
            textures: TextureSlots::new(),
            channels: TextureChannels::empty(),
            multipliers,
            shader: None,
            tracker: ChangeTracker::new(),
            assets,
        }
    }

    // ========================================================================
    // Texture slots
    // ========================================================================

    /// Binds (`Some`) or clears (`None`) the texture for `role`, then
    /// re-resolves the shader variant for the new mask.
    ///
    /// Binding stores the texture cache's canonical instance and forces the
    /// role's multiplier to `1.0`. Clearing leaves the multiplier untouched.
    ///
    /// If the new variant fails to compile the slot change is kept, the
    /// previous shader stays bound and the error is returned.
    pub fn set_texture_slot(&mut self, role: TextureRole, texture: Option<Arc<Texture>>) -> Result<()> {
        if !self.apply_texture_slot(role, texture) {
            return Ok(());
        }
        self.refresh_shader()
    }

    /// Slot/mask/multiplier update without shader resolution.
    /// Returns `false` if the role owns no channel.
    pub(crate) fn apply_texture_slot(&mut self, role: TextureRole, texture: Option<Arc<Texture>>) -> bool {
        let Some(index) = role.index() else {
            log::warn!("Ignoring texture slot change for role {role}");
            return false;
        };

        match texture {
            Some(texture) => {
                let canonical = self.assets.textures.cache(texture);
                self.textures.insert(role, canonical);
                self.channels.insert(role.channel());
                self.multipliers[index] = 1.0;
            }
            None => {
                self.textures.remove(&role);
                self.channels.remove(role.channel());
            }
        }

        debug_assert_eq!(self.channels, derive_mask(&self.textures));
        self.tracker.changed();
        true
    }

    /// Resolves the variant for the current mask and binds it.
    ///
    /// On error the previously bound variant (if any) is kept.
    pub fn refresh_shader(&mut self) -> Result<()> {
        match self.assets.shaders.resolve(self.channels) {
            Ok(variant) => {
                self.shader = Some(variant);
                Ok(())
            }
            Err(e) => {
                log::warn!(
                    "Material {} keeps its previous shader, variant {:?} unavailable",
                    self.uuid,
                    self.channels
                );
                Err(e)
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> TextureChannels {
        self.channels
    }

    #[inline]
    #[must_use]
    pub fn shader(&self) -> Option<&Arc<ShaderVariant>> {
        self.shader.as_ref()
    }

    /// Whether the bound shader was generated for the current mask.
    #[must_use]
    pub fn is_shader_current(&self) -> bool {
        self.shader
            .as_ref()
            .is_some_and(|shader| shader.channels() == self.channels)
    }

    #[must_use]
    pub fn texture(&self, role: TextureRole) -> Option<&Arc<Texture>> {
        self.textures.get(&role)
    }

    #[must_use]
    pub fn has_texture(&self, role: TextureRole) -> bool {
        self.textures.contains_key(&role)
    }

    /// Whether any slot holds a texture loaded from `path`.
    #[must_use]
    pub fn has_texture_path(&self, path: &Path) -> bool {
        self.textures
            .values()
            .any(|texture| texture.path() == Some(path))
    }

    #[must_use]
    pub fn texture_path(&self, role: TextureRole) -> Option<&Path> {
        self.textures.get(&role).and_then(|texture| texture.path())
    }

    #[must_use]
    pub fn texture_paths(&self) -> Vec<&Path> {
        self.textures
            .values()
            .filter_map(|texture| texture.path())
            .collect()
    }

    /// Populated slots in role order.
    pub fn textures(&self) -> impl Iterator<Item = (TextureRole, &Arc<Texture>)> {
        self.textures.iter().map(|(role, texture)| (*role, texture))
    }

    // ========================================================================
    // Scalar properties
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn multiplier(&self, role: TextureRole) -> f32 {
        role.index().map_or(0.0, |index| self.multipliers[index])
    }

    pub fn set_multiplier(&mut self, role: TextureRole, value: f32) {
        if let Some(index) = role.index() {
            self.multipliers[index] = value;
            self.tracker.changed();
        }
    }

    #[inline]
    #[must_use]
    pub fn color_albedo(&self) -> Vec4 {
        self.color_albedo
    }

    /// Sets the albedo color.
    ///
    /// Moving alpha onto or off `1.0` moves the material between the opaque
    /// and transparent render buckets, so the world is marked dirty.
    #[allow(clippy::float_cmp)]
    pub fn set_color_albedo(&mut self, color: Vec4) {
        let was_opaque = self.color_albedo.w == 1.0;
        let is_opaque = color.w == 1.0;
        if was_opaque != is_opaque {
            self.assets.world.mark_dirty();
        }

        self.color_albedo = color;
        self.tracker.changed();
    }

    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.color_albedo.w != 1.0
    }

    #[inline]
    #[must_use]
    pub fn uv_tiling(&self) -> Vec2 {
        self.uv_tiling
    }

    pub fn set_uv_tiling(&mut self, tiling: Vec2) {
        self.uv_tiling = tiling;
        self.tracker.changed();
    }

    #[inline]
    #[must_use]
    pub fn uv_offset(&self) -> Vec2 {
        self.uv_offset
    }

    pub fn set_uv_offset(&mut self, offset: Vec2) {
        self.uv_offset = offset;
        self.tracker.changed();
    }

    #[inline]
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.is_editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.is_editable = editable;
    }

    // ========================================================================
    // Identity
    // ========================================================================

    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub(crate) fn set_file_path(&mut self, path: &Path) {
        self.file_path = Some(path.to_path_buf());
    }

    /// Resource name: the file stem of the material document.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.file_path
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|stem| stem.to_str())
    }

    /// Bumped on every state change; the renderer re-uploads uniforms when it moves.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.tracker.version()
    }

    #[must_use]
    pub fn assets(&self) -> &AssetServer {
        &self.assets
    }

    /// Writes scalar fields read from a document, without the notifications
    /// and cache lookups the public setters perform.
    pub(crate) fn restore_fields(
        &mut self,
        color_albedo: Vec4,
        uv_tiling: Vec2,
        uv_offset: Vec2,
        is_editable: bool,
    ) {
        self.color_albedo = color_albedo;
        self.uv_tiling = uv_tiling;
        self.uv_offset = uv_offset;
        self.is_editable = is_editable;
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("uuid", &self.uuid)
            .field("file_path", &self.file_path)
            .field("channels", &self.channels)
            .field("color_albedo", &self.color_albedo)
            .field("textures", &self.textures.keys().collect::<Vec<_>>())
            .field("has_shader", &self.shader.is_some())
            .finish_non_exhaustive()
    }
}
