use std::fmt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::resources::channels::TextureChannels;

// ============================================================================
// 1. Texture Roles
// ============================================================================

/// The purpose a texture serves on a material.
///
/// The string mapping is total: names that match no role map to
/// [`TextureRole::Unknown`], which owns no channel bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum TextureRole {
    #[default]
    Unknown,
    Albedo,
    Roughness,
    Metallic,
    Normal,
    Height,
    Occlusion,
    Emission,
    Mask,
}

impl TextureRole {
    /// Number of roles that own a channel bit.
    pub const COUNT: usize = 8;

    /// Every role that owns a channel bit, in bit order.
    pub const ALL: [TextureRole; Self::COUNT] = [
        Self::Albedo,
        Self::Roughness,
        Self::Metallic,
        Self::Normal,
        Self::Height,
        Self::Occlusion,
        Self::Emission,
        Self::Mask,
    ];

    /// The channel bit of this role (empty for `Unknown`).
    #[must_use]
    pub const fn channel(self) -> TextureChannels {
        match self {
            Self::Unknown => TextureChannels::empty(),
            Self::Albedo => TextureChannels::ALBEDO,
            Self::Roughness => TextureChannels::ROUGHNESS,
            Self::Metallic => TextureChannels::METALLIC,
            Self::Normal => TextureChannels::NORMAL,
            Self::Height => TextureChannels::HEIGHT,
            Self::Occlusion => TextureChannels::OCCLUSION,
            Self::Emission => TextureChannels::EMISSION,
            Self::Mask => TextureChannels::MASK,
        }
    }

    /// Dense index into per-role tables, `None` for `Unknown`.
    #[inline]
    #[must_use]
    pub fn index(self) -> Option<usize> {
        let bits = self.channel().bits();
        (bits != 0).then(|| bits.trailing_zeros() as usize)
    }

    /// Persisted integer id: the role's channel bit value.
    #[inline]
    #[must_use]
    pub fn id(self) -> u32 {
        u32::from(self.channel().bits())
    }

    /// Inverse of [`TextureRole::id`]. Ids that are not a single role bit map to `Unknown`.
    #[must_use]
    pub fn from_id(id: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|role| role.id() == id)
            .unwrap_or(Self::Unknown)
    }

    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Albedo" => Self::Albedo,
            "Roughness" => Self::Roughness,
            "Metallic" => Self::Metallic,
            "Normal" => Self::Normal,
            "Height" => Self::Height,
            "Occlusion" => Self::Occlusion,
            "Emission" => Self::Emission,
            "Mask" => Self::Mask,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Albedo => "Albedo",
            Self::Roughness => "Roughness",
            Self::Metallic => "Metallic",
            Self::Normal => "Normal",
            Self::Height => "Height",
            Self::Occlusion => "Occlusion",
            Self::Emission => "Emission",
            Self::Mask => "Mask",
        }
    }
}

impl From<&str> for TextureRole {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for TextureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// 2. Texture Asset
// ============================================================================

/// A texture resource as seen by materials.
///
/// Pixel data lives with the renderer; materials only need the identity
/// (name and source path) to share, compare and persist it.
#[derive(Debug)]
pub struct Texture {
    pub uuid: Uuid,
    name: String,
    path: Option<PathBuf>,
    width: u32,
    height: u32,
}

impl Texture {
    #[must_use]
    pub fn new(name: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            path,
            width: 0,
            height: 0,
        }
    }

    /// Creates a texture record for a file whose header has been probed.
    #[must_use]
    pub fn from_file(path: impl AsRef<Path>, width: u32, height: u32) -> Self {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            uuid: Uuid::new_v4(),
            name,
            path: Some(path.to_path_buf()),
            width,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Source path as written to material documents (empty when unknown).
    #[must_use]
    pub fn path_string(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
