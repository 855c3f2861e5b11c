//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use texel::errors::{Result, TexelError};
use texel::{
    AssetServer, ResourceCache, ShaderBackend, ShaderVariant, ShaderVariantRegistry,
    TextureChannels, WorldNotifier,
};
use uuid::Uuid;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Backend that records every compile request and can be told to fail.
#[derive(Default)]
pub struct CountingBackend {
    calls: AtomicUsize,
    compiled: Mutex<Vec<TextureChannels>>,
    fail: AtomicBool,
}

impl CountingBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Masks that compiled successfully, in order.
    pub fn compiled(&self) -> Vec<TextureChannels> {
        self.compiled.lock().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl ShaderBackend for CountingBackend {
    fn compile(&self, source_file: &Path, channels: TextureChannels) -> Result<ShaderVariant> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(TexelError::ShaderCompile {
                channels,
                message: "backend rejected permutation".into(),
            });
        }

        self.compiled.lock().push(channels);
        Ok(ShaderVariant::new(
            channels,
            source_file,
            format!("// variant {:#04x}", channels.bits()),
        ))
    }
}

#[derive(Default)]
pub struct CountingWorld {
    dirty: AtomicUsize,
}

impl CountingWorld {
    pub fn dirty_count(&self) -> usize {
        self.dirty.load(Ordering::SeqCst)
    }
}

impl WorldNotifier for CountingWorld {
    fn mark_dirty(&self) {
        self.dirty.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Fixture {
    pub assets: AssetServer,
    pub backend: Arc<CountingBackend>,
    pub world: Arc<CountingWorld>,
    pub cache: Arc<ResourceCache>,
}

pub fn fixture() -> Fixture {
    init_logger();

    let backend = Arc::new(CountingBackend::default());
    let world = Arc::new(CountingWorld::default());
    let cache = Arc::new(ResourceCache::new());
    let registry = ShaderVariantRegistry::with_backend(backend.clone(), "gbuffer.wgsl");

    let assets = AssetServer::from_parts(cache.clone(), Arc::new(registry), world.clone());

    Fixture {
        assets,
        backend,
        world,
        cache,
    }
}

/// Fresh directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("texel-test-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// Writes a small PNG and returns its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(format!("{name}.png"));
    image::RgbaImage::new(width, height)
        .save(&path)
        .expect("write png");
    path
}
