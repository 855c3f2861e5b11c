//! Material Serializer Tests
//!
//! Tests for:
//! - Save/load round trip of scalars, slots, paths and mask
//! - Document layout (section and key names)
//! - Malformed documents and missing fields
//! - Missing textures, unknown texture types, resident-name lookup

mod common;

use std::sync::Arc;

use common::{fixture, temp_dir, write_png};
use glam::{Vec2, Vec4};
use texel::errors::TexelError;
use texel::{MaterialSerializer, Texture, TextureCache, TextureChannels, TextureRole};

fn entry(kind: u32, name: &str, path: &str) -> serde_json::Value {
    serde_json::json!({
        "Texture_Type": kind,
        "Texture_Name": name,
        "Texture_Path": path,
    })
}

fn document(textures: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "Material": {
            "Color": [0.8, 0.6, 0.4, 1.0],
            "Roughness_Multiplier": 0.5,
            "Metallic_Multiplier": 0.0,
            "Normal_Multiplier": 1.0,
            "Height_Multiplier": 0.2,
            "UV_Tiling": [1.0, 1.0],
            "UV_Offset": [0.0, 0.0],
            "IsEditable": true,
        },
        "Textures": textures,
    })
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn round_trip_preserves_material() -> anyhow::Result<()> {
    let fx = fixture();
    let dir = temp_dir();
    let albedo = write_png(&dir, "bricks_albedo", 4, 4);
    let normal = write_png(&dir, "bricks_normal", 8, 8);
    let height = write_png(&dir, "bricks_height", 2, 2);

    let mut material = fx.assets.create_material();
    material.set_texture_slot(TextureRole::Albedo, Some(fx.cache.load(&albedo)?))?;
    material.set_texture_slot(TextureRole::Normal, Some(fx.cache.load(&normal)?))?;
    material.set_texture_slot(TextureRole::Height, Some(fx.cache.load(&height)?))?;
    material.set_multiplier(TextureRole::Normal, 0.75);
    material.set_multiplier(TextureRole::Height, 0.05);
    material.set_multiplier(TextureRole::Roughness, 0.3);
    material.set_color_albedo(Vec4::new(0.9, 0.1, 0.2, 0.5));
    material.set_uv_tiling(Vec2::new(2.0, 3.0));
    material.set_uv_offset(Vec2::new(0.25, 0.5));
    material.set_editable(false);

    let path = dir.join("bricks.material");
    fx.assets.save_material(&mut material, &path)?;
    assert_eq!(material.file_path(), Some(path.as_path()));
    assert_eq!(material.name(), Some("bricks"));

    let loaded = fx.assets.load_material(&path)?;

    assert_eq!(loaded.channels(), material.channels());
    assert_eq!(
        loaded.channels(),
        TextureChannels::ALBEDO | TextureChannels::NORMAL | TextureChannels::HEIGHT
    );
    for role in [TextureRole::Albedo, TextureRole::Normal, TextureRole::Height] {
        assert_eq!(loaded.texture_path(role), material.texture_path(role));
        assert!(Arc::ptr_eq(
            loaded.texture(role).unwrap(),
            material.texture(role).unwrap()
        ));
    }
    for role in TextureRole::ALL {
        assert!(
            (loaded.multiplier(role) - material.multiplier(role)).abs() < f32::EPSILON,
            "{role} multiplier"
        );
    }
    assert_eq!(loaded.color_albedo(), material.color_albedo());
    assert_eq!(loaded.uv_tiling(), material.uv_tiling());
    assert_eq!(loaded.uv_offset(), material.uv_offset());
    assert!(!loaded.is_editable());
    assert_eq!(loaded.file_path(), Some(path.as_path()));

    assert!(Arc::ptr_eq(loaded.shader().unwrap(), material.shader().unwrap()));
    Ok(())
}

#[test]
fn load_compiles_only_the_final_mask() -> anyhow::Result<()> {
    let fx = fixture();
    let dir = temp_dir();
    let a = write_png(&dir, "a", 1, 1);
    let m = write_png(&dir, "m", 1, 1);

    let path = dir.join("two.material");
    let doc = document(serde_json::json!({
        "Count": 2,
        "Texture_0": entry(TextureRole::Albedo.id(), "a", &a.to_string_lossy()),
        "Texture_1": entry(TextureRole::Metallic.id(), "m", &m.to_string_lossy()),
    }));
    std::fs::write(&path, serde_json::to_string_pretty(&doc)?)?;

    let loaded = MaterialSerializer::load(&path, &fx.assets)?;

    assert_eq!(
        loaded.channels(),
        TextureChannels::ALBEDO | TextureChannels::METALLIC
    );
    assert_eq!(
        fx.backend.compiled(),
        vec![TextureChannels::ALBEDO | TextureChannels::METALLIC]
    );
    Ok(())
}

#[test]
fn saved_document_layout() -> anyhow::Result<()> {
    let fx = fixture();
    let dir = temp_dir();
    let png = write_png(&dir, "dirt", 2, 2);

    let mut material = fx.assets.create_material();
    material.set_texture_slot(TextureRole::Occlusion, Some(fx.cache.load(&png)?))?;

    let path = dir.join("dirt.material");
    MaterialSerializer::save(&mut material, &path)?;

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(json["Textures"]["Count"], 1);
    assert_eq!(json["Textures"]["Texture_0"]["Texture_Type"], TextureRole::Occlusion.id());
    assert_eq!(json["Textures"]["Texture_0"]["Texture_Name"], "dirt");
    assert_eq!(json["Material"]["IsEditable"], true);
    assert_eq!(json["Material"]["Color"].as_array().map(Vec::len), Some(4));
    assert!(json["Material"]["Roughness_Multiplier"].is_number());
    Ok(())
}

// ============================================================================
// Malformed Documents
// ============================================================================

#[test]
fn missing_file_is_io_error() {
    let fx = fixture();
    let path = temp_dir().join("nope.material");

    let err = MaterialSerializer::load(&path, &fx.assets).unwrap_err();
    assert!(matches!(err, TexelError::IoError(_)));
}

#[test]
fn missing_field_is_parse_error() -> anyhow::Result<()> {
    let fx = fixture();
    let path = temp_dir().join("broken.material");

    let mut doc = document(serde_json::json!({ "Count": 0 }));
    doc["Material"]
        .as_object_mut()
        .unwrap()
        .remove("UV_Tiling");
    std::fs::write(&path, doc.to_string())?;

    let err = MaterialSerializer::load(&path, &fx.assets).unwrap_err();
    assert!(matches!(err, TexelError::ParseError { ref message, .. } if message.contains("UV_Tiling")));
    Ok(())
}

#[test]
fn missing_indexed_entry_is_parse_error() -> anyhow::Result<()> {
    let fx = fixture();
    let path = temp_dir().join("gap.material");
    let doc = document(serde_json::json!({
        "Count": 2,
        "Texture_0": entry(1, "a", "a.png"),
    }));
    std::fs::write(&path, doc.to_string())?;

    let err = MaterialSerializer::load(&path, &fx.assets).unwrap_err();
    assert!(matches!(err, TexelError::ParseError { .. }));
    Ok(())
}

#[test]
fn invalid_json_is_parse_error() -> anyhow::Result<()> {
    let fx = fixture();
    let path = temp_dir().join("garbage.material");
    std::fs::write(&path, "{ \"Material\": ")?;

    let err = MaterialSerializer::load(&path, &fx.assets).unwrap_err();
    assert!(matches!(err, TexelError::ParseError { .. }));
    Ok(())
}

// ============================================================================
// Texture Resolution
// ============================================================================

#[test]
fn unavailable_texture_is_skipped() -> anyhow::Result<()> {
    let fx = fixture();
    let dir = temp_dir();
    let albedo = write_png(&dir, "albedo", 2, 2);
    let missing = dir.join("missing_normal.png");

    let path = dir.join("partial.material");
    let doc = document(serde_json::json!({
        "Count": 2,
        "Texture_0": entry(TextureRole::Albedo.id(), "albedo", &albedo.to_string_lossy()),
        "Texture_1": entry(TextureRole::Normal.id(), "missing_normal", &missing.to_string_lossy()),
    }));
    std::fs::write(&path, doc.to_string())?;

    let loaded = MaterialSerializer::load(&path, &fx.assets)?;

    assert_eq!(loaded.channels(), TextureChannels::ALBEDO);
    assert!(!loaded.has_texture(TextureRole::Normal));
    assert_eq!(loaded.shader().unwrap().channels(), TextureChannels::ALBEDO);
    Ok(())
}

#[test]
fn unknown_texture_type_is_skipped() -> anyhow::Result<()> {
    let fx = fixture();
    let dir = temp_dir();
    let png = write_png(&dir, "odd", 2, 2);

    let path = dir.join("odd.material");
    let doc = document(serde_json::json!({
        "Count": 1,
        "Texture_0": entry(3, "odd", &png.to_string_lossy()),
    }));
    std::fs::write(&path, doc.to_string())?;

    let loaded = MaterialSerializer::load(&path, &fx.assets)?;
    assert_eq!(loaded.channels(), TextureChannels::empty());
    assert_eq!(loaded.textures().count(), 0);
    Ok(())
}

#[test]
fn resident_texture_is_found_by_name() -> anyhow::Result<()> {
    let fx = fixture();
    let resident = fx.cache.cache(Arc::new(Texture::new("procedural_noise", None)));

    let path = temp_dir().join("noise.material");
    let doc = document(serde_json::json!({
        "Count": 1,
        "Texture_0": entry(TextureRole::Roughness.id(), "procedural_noise", ""),
    }));
    std::fs::write(&path, doc.to_string())?;

    let loaded = MaterialSerializer::load(&path, &fx.assets)?;

    let bound = loaded.texture(TextureRole::Roughness).unwrap();
    assert!(Arc::ptr_eq(bound, &resident));
    // Document value wins over the bind-time reset to 1.0.
    assert!((loaded.multiplier(TextureRole::Roughness) - 0.5).abs() < f32::EPSILON);
    Ok(())
}

#[test]
fn compile_failure_still_returns_material() -> anyhow::Result<()> {
    let fx = fixture();
    let dir = temp_dir();
    let png = write_png(&dir, "e", 1, 1);

    let path = dir.join("glow.material");
    let doc = document(serde_json::json!({
        "Count": 1,
        "Texture_0": entry(TextureRole::Emission.id(), "e", &png.to_string_lossy()),
    }));
    std::fs::write(&path, doc.to_string())?;

    fx.backend.set_failing(true);
    let mut loaded = MaterialSerializer::load(&path, &fx.assets)?;
    assert_eq!(loaded.channels(), TextureChannels::EMISSION);
    assert!(loaded.shader().is_none());

    fx.backend.set_failing(false);
    loaded.refresh_shader()?;
    assert!(loaded.is_shader_current());
    Ok(())
}

#[test]
fn same_named_textures_keep_their_paths() -> anyhow::Result<()> {
    let fx = fixture();
    let dir = temp_dir();
    let brick_dir = dir.join("brick");
    let wood_dir = dir.join("wood");
    std::fs::create_dir_all(&brick_dir)?;
    std::fs::create_dir_all(&wood_dir)?;
    let brick = write_png(&brick_dir, "albedo", 2, 2);
    let wood = write_png(&wood_dir, "albedo", 4, 4);

    let mut material = fx.assets.create_material();
    material.set_texture_slot(TextureRole::Albedo, Some(fx.cache.load(&brick)?))?;
    material.set_texture_slot(TextureRole::Normal, Some(fx.cache.load(&wood)?))?;
    assert_eq!(fx.cache.len(), 2);

    let path = dir.join("mixed.material");
    MaterialSerializer::save(&mut material, &path)?;
    let loaded = MaterialSerializer::load(&path, &fx.assets)?;

    assert_eq!(loaded.texture_path(TextureRole::Albedo), Some(brick.as_path()));
    assert_eq!(loaded.texture_path(TextureRole::Normal), Some(wood.as_path()));
    assert!(Arc::ptr_eq(
        loaded.texture(TextureRole::Normal).unwrap(),
        material.texture(TextureRole::Normal).unwrap()
    ));
    Ok(())
}

#[test]
fn name_hit_with_other_path_loads_recorded_file() -> anyhow::Result<()> {
    let fx = fixture();
    let dir = temp_dir();
    std::fs::create_dir_all(dir.join("a"))?;
    std::fs::create_dir_all(dir.join("b"))?;
    let resident = fx.cache.load(&write_png(&dir.join("a"), "bricks", 2, 2))?;
    let other = write_png(&dir.join("b"), "bricks", 2, 2);

    let path = dir.join("b.material");
    let doc = document(serde_json::json!({
        "Count": 1,
        "Texture_0": entry(TextureRole::Albedo.id(), "bricks", &other.to_string_lossy()),
    }));
    std::fs::write(&path, doc.to_string())?;

    let loaded = MaterialSerializer::load(&path, &fx.assets)?;

    let bound = loaded.texture(TextureRole::Albedo).unwrap();
    assert!(!Arc::ptr_eq(bound, &resident));
    assert_eq!(bound.path(), Some(other.as_path()));
    Ok(())
}

#[test]
fn failed_save_keeps_previous_identity() -> anyhow::Result<()> {
    let fx = fixture();
    let dir = temp_dir();
    let mut material = fx.assets.create_material();

    let good = dir.join("good.material");
    MaterialSerializer::save(&mut material, &good)?;

    let unwritable = dir.join("no_such_dir").join("bad.material");
    let err = MaterialSerializer::save(&mut material, &unwritable).unwrap_err();

    assert!(matches!(err, TexelError::IoError(_)));
    assert_eq!(material.file_path(), Some(good.as_path()));
    Ok(())
}
