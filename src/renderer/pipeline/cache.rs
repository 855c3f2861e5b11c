//! Shader Variant Registry
//!
//! Central owner of every compiled [`ShaderVariant`]. Variants are keyed by
//! the [`TextureChannels`] mask they were generated for and handed out as
//! shared `Arc`s, so every material with the same mask holds the same
//! program.
//!
//! # Compile-Once Semantics
//!
//! Each mask owns a slot guarded by its own mutex. The map lock is only held
//! to find or insert that slot; compilation runs under the slot lock alone.
//! Concurrent first access to one mask therefore compiles once, while
//! different masks compile in parallel.
//!
//! Failed compilations leave the slot empty, so the next request for the
//! same mask tries again.
//!
//! Variants are never evicted: there are at most 256 masks.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use super::shader_gen::{ShaderBackend, ShaderVariant};
use crate::errors::{Result, TexelError};
use crate::resources::channels::TextureChannels;

type VariantSlot = Arc<Mutex<Option<Arc<ShaderVariant>>>>;

/// Mask → compiled shader variant cache.
pub struct ShaderVariantRegistry {
    backend: RwLock<Option<Arc<dyn ShaderBackend>>>,
    /// Source every variant is generated from.
    source_file: PathBuf,
    variants: RwLock<FxHashMap<TextureChannels, VariantSlot>>,
    /// Filled slots; read without touching any slot lock.
    compiled: AtomicUsize,
}

impl ShaderVariantRegistry {
    /// Creates a registry with no backend attached.
    ///
    /// [`ShaderVariantRegistry::resolve`] fails with
    /// [`TexelError::InvalidContext`] until [`ShaderVariantRegistry::attach_backend`] is called.
    #[must_use]
    pub fn new(source_file: impl Into<PathBuf>) -> Self {
        Self {
            backend: RwLock::new(None),
            source_file: source_file.into(),
            variants: RwLock::new(FxHashMap::default()),
            compiled: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_backend(backend: Arc<dyn ShaderBackend>, source_file: impl Into<PathBuf>) -> Self {
        let registry = Self::new(source_file);
        registry.attach_backend(backend);
        registry
    }

    /// Attaches (or replaces) the compilation backend. Already compiled
    /// variants stay cached.
    pub fn attach_backend(&self, backend: Arc<dyn ShaderBackend>) {
        *self.backend.write() = Some(backend);
    }

    #[must_use]
    pub fn has_backend(&self) -> bool {
        self.backend.read().is_some()
    }

    #[inline]
    #[must_use]
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    // ── Resolution ───────────────────────────────────────────────────────────

    /// Returns the variant for `channels`, compiling it with the attached
    /// backend on first use.
    pub fn resolve(&self, channels: TextureChannels) -> Result<Arc<ShaderVariant>> {
        let Some(backend) = self.backend.read().clone() else {
            log::error!(
                "No shader backend attached, can't resolve variant {channels:?}"
            );
            return Err(TexelError::InvalidContext(
                "shader registry has no compilation backend".into(),
            ));
        };

        self.resolve_with(channels, |mask| backend.compile(&self.source_file, mask))
    }

    /// Returns the variant for `channels`, calling `compile` only when no
    /// variant has been stored for that mask yet.
    ///
    /// Errors from `compile` are returned as-is and nothing is cached.
    pub fn resolve_with<F>(&self, channels: TextureChannels, compile: F) -> Result<Arc<ShaderVariant>>
    where
        F: FnOnce(TextureChannels) -> Result<ShaderVariant>,
    {
        let slot = self.slot(channels);
        let mut guard = slot.lock();

        if let Some(existing) = guard.as_ref() {
            log::debug!("Shader variant {channels:?} cache hit");
            return Ok(Arc::clone(existing));
        }

        let variant = Arc::new(compile(channels)?);
        log::info!(
            "Compiled shader variant {channels:?} from {}",
            variant.source_file().display()
        );
        *guard = Some(Arc::clone(&variant));
        self.compiled.fetch_add(1, Ordering::Release);

        Ok(variant)
    }

    /// Returns the cached variant for `channels` without compiling.
    #[must_use]
    pub fn get(&self, channels: TextureChannels) -> Option<Arc<ShaderVariant>> {
        let slot = self.variants.read().get(&channels).cloned()?;
        let guard = slot.lock();
        guard.clone()
    }

    /// Number of successfully compiled variants.
    ///
    /// Never waits on an in-flight compilation.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.compiled.load(Ordering::Acquire)
    }

    fn slot(&self, channels: TextureChannels) -> VariantSlot {
        if let Some(slot) = self.variants.read().get(&channels) {
            return Arc::clone(slot);
        }

        let mut map = self.variants.write();
        Arc::clone(map.entry(channels).or_default())
    }
}

impl std::fmt::Debug for ShaderVariantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderVariantRegistry")
            .field("source_file", &self.source_file)
            .field("has_backend", &self.has_backend())
            .field("variants", &self.variant_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn variant(mask: TextureChannels) -> Result<ShaderVariant> {
        Ok(ShaderVariant::new(mask, "gbuffer.wgsl", format!("// {}", mask.bits())))
    }

    #[test]
    fn test_same_mask_returns_same_handle() {
        let registry = ShaderVariantRegistry::new("gbuffer.wgsl");
        let calls = AtomicUsize::new(0);
        let compile = |mask| {
            calls.fetch_add(1, Ordering::SeqCst);
            variant(mask)
        };

        let a = registry.resolve_with(TextureChannels::ALBEDO, compile).unwrap();
        let b = registry.resolve_with(TextureChannels::ALBEDO, compile).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.variant_count(), 1);
    }

    #[test]
    fn test_failed_compile_is_not_cached() {
        let registry = ShaderVariantRegistry::new("gbuffer.wgsl");
        let mask = TextureChannels::NORMAL;

        let err = registry
            .resolve_with(mask, |channels| {
                Err(TexelError::ShaderCompile {
                    channels,
                    message: "device lost".into(),
                })
            })
            .unwrap_err();
        assert!(matches!(err, TexelError::ShaderCompile { .. }));
        assert!(registry.get(mask).is_none());
        assert_eq!(registry.variant_count(), 0);

        let retried = registry.resolve_with(mask, variant).unwrap();
        assert_eq!(retried.channels(), mask);
        assert!(registry.get(mask).is_some());
    }

    #[test]
    fn test_resolve_without_backend_is_invalid_context() {
        let registry = ShaderVariantRegistry::new("gbuffer.wgsl");
        assert!(!registry.has_backend());
        assert!(matches!(
            registry.resolve(TextureChannels::empty()),
            Err(TexelError::InvalidContext(_))
        ));
    }

    #[test]
    fn test_variant_count_does_not_wait_on_compilation() {
        let registry = ShaderVariantRegistry::new("gbuffer.wgsl");
        registry.resolve_with(TextureChannels::ALBEDO, variant).unwrap();

        let result = registry.resolve_with(TextureChannels::NORMAL, |mask| {
            // The NORMAL slot is locked here.
            let during = registry.variant_count();
            let _ = format!("{registry:?}");
            assert_eq!(during, 1);
            variant(mask)
        });

        assert!(result.is_ok());
        assert_eq!(registry.variant_count(), 2);
    }
}
