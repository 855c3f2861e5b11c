//! Material Documents
//!
//! Reads and writes materials as JSON documents with a `Material` section
//! (color, multipliers, UV transform, editability) and a `Textures` section
//! (`Count` followed by `Texture_0` .. `Texture_{Count-1}`).
//!
//! The shader variant is never persisted: it is re-resolved from the mask
//! once all texture slots of a loaded document are bound.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::assets::AssetServer;
use crate::errors::{Result, TexelError};
use crate::resources::material::Material;
use crate::resources::texture::{Texture, TextureRole};

// ============================================================================
// Document layout
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct MaterialDocument {
    #[serde(rename = "Material")]
    material: MaterialSection,
    #[serde(rename = "Textures")]
    textures: TexturesSection,
}

#[derive(Debug, Serialize, Deserialize)]
struct MaterialSection {
    #[serde(rename = "Color")]
    color: [f32; 4],
    #[serde(rename = "Roughness_Multiplier")]
    roughness_multiplier: f32,
    #[serde(rename = "Metallic_Multiplier")]
    metallic_multiplier: f32,
    #[serde(rename = "Normal_Multiplier")]
    normal_multiplier: f32,
    #[serde(rename = "Height_Multiplier")]
    height_multiplier: f32,
    #[serde(rename = "UV_Tiling")]
    uv_tiling: [f32; 2],
    #[serde(rename = "UV_Offset")]
    uv_offset: [f32; 2],
    #[serde(rename = "IsEditable")]
    is_editable: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct TexturesSection {
    #[serde(rename = "Count")]
    count: u32,
    #[serde(flatten)]
    entries: BTreeMap<String, TextureEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextureEntry {
    #[serde(rename = "Texture_Type")]
    texture_type: u32,
    #[serde(rename = "Texture_Name")]
    texture_name: String,
    #[serde(rename = "Texture_Path")]
    texture_path: String,
}

fn entry_key(index: u32) -> String {
    format!("Texture_{index}")
}

impl TexturesSection {
    /// Entries `Texture_0..Texture_{Count-1}`; any gap fails the document.
    fn ordered_entries(&self) -> std::result::Result<Vec<&TextureEntry>, String> {
        (0..self.count)
            .map(|i| {
                let key = entry_key(i);
                self.entries
                    .get(&key)
                    .ok_or_else(|| format!("missing '{key}' (Count is {})", self.count))
            })
            .collect()
    }
}

impl MaterialDocument {
    fn from_material(material: &Material) -> Self {
        let entries: BTreeMap<_, _> = material
            .textures()
            .zip(0u32..)
            .map(|((role, texture), i)| {
                (
                    entry_key(i),
                    TextureEntry {
                        texture_type: role.id(),
                        texture_name: texture.name().to_string(),
                        texture_path: texture.path_string(),
                    },
                )
            })
            .collect();

        Self {
            material: MaterialSection {
                color: material.color_albedo().to_array(),
                roughness_multiplier: material.multiplier(TextureRole::Roughness),
                metallic_multiplier: material.multiplier(TextureRole::Metallic),
                normal_multiplier: material.multiplier(TextureRole::Normal),
                height_multiplier: material.multiplier(TextureRole::Height),
                uv_tiling: material.uv_tiling().to_array(),
                uv_offset: material.uv_offset().to_array(),
                is_editable: material.is_editable(),
            },
            textures: TexturesSection {
                count: entries.len() as u32,
                entries,
            },
        }
    }
}

// ============================================================================
// Serializer
// ============================================================================

pub struct MaterialSerializer;

impl MaterialSerializer {
    /// Writes `material` to `path` and makes `path` its file identity.
    /// On a failed write the material keeps its previous identity.
    pub fn save(material: &mut Material, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let document = MaterialDocument::from_material(material);
        let text = serde_json::to_string_pretty(&document)?;
        std::fs::write(path, text)?;
        material.set_file_path(path);

        log::debug!(
            "Saved material '{}' with {} texture(s)",
            path.display(),
            document.textures.count
        );
        Ok(())
    }

    /// Reads a material document.
    ///
    /// The whole load fails on I/O errors and on missing or malformed fields.
    /// Individual textures that cannot be found are logged and left unbound.
    /// A shader compile failure is logged; the material is returned without
    /// a shader and [`Material::refresh_shader`] may be retried later.
    pub fn load(path: impl AsRef<Path>, assets: &AssetServer) -> Result<Material> {
        let path = path.as_ref();
        let parse_error = |message: String| TexelError::ParseError {
            path: path.to_path_buf(),
            message,
        };

        let text = std::fs::read_to_string(path)?;
        let document: MaterialDocument =
            serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?;
        let entries = document.textures.ordered_entries().map_err(parse_error)?;

        let mut material = Material::unresolved(assets.clone());
        material.set_file_path(path);

        for entry in entries {
            let role = TextureRole::from_id(entry.texture_type);
            if role == TextureRole::Unknown {
                log::warn!(
                    "Material '{}': skipping texture '{}' with unknown type {}",
                    path.display(),
                    entry.texture_name,
                    entry.texture_type
                );
                continue;
            }

            match Self::acquire_texture(assets, entry) {
                Ok(texture) => {
                    material.apply_texture_slot(role, Some(texture));
                }
                Err(e) => log::warn!(
                    "Material '{}': {role} texture '{}' unavailable: {e}",
                    path.display(),
                    entry.texture_path
                ),
            }
        }

        // Multipliers are applied after binding so values tuned after a
        // texture was bound survive the round trip.
        let section = &document.material;
        material.set_multiplier(TextureRole::Roughness, section.roughness_multiplier);
        material.set_multiplier(TextureRole::Metallic, section.metallic_multiplier);
        material.set_multiplier(TextureRole::Normal, section.normal_multiplier);
        material.set_multiplier(TextureRole::Height, section.height_multiplier);
        material.restore_fields(
            Vec4::from_array(section.color),
            Vec2::from_array(section.uv_tiling),
            Vec2::from_array(section.uv_offset),
            section.is_editable,
        );

        if let Err(e) = material.refresh_shader() {
            log::error!("Material '{}' loaded without shader: {e}", path.display());
        }

        Ok(material)
    }

    /// Resident texture by name, otherwise a load from the recorded path.
    ///
    /// Names are file stems, so a name hit only counts when the recorded
    /// path is empty or matches the resident texture's path.
    fn acquire_texture(assets: &AssetServer, entry: &TextureEntry) -> Result<Arc<Texture>> {
        let recorded = Path::new(&entry.texture_path);

        if !entry.texture_name.is_empty()
            && let Some(texture) = assets.textures.get_by_name(&entry.texture_name)
            && (entry.texture_path.is_empty() || texture.path() == Some(recorded))
        {
            return Ok(texture);
        }
        assets.textures.load(recorded)
    }
}
