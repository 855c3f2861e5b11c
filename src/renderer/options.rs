//! Renderer Options
//!
//! Boolean render features and float tunables, read and written by the
//! editor's options panel through plain accessors.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use texel::renderer::{OptionValue, RenderFlags, RendererOptions};
//!
//! let mut options = RendererOptions::default();
//! options.set_option(RenderFlags::BLOOM, false);
//! options.set_option_value(OptionValue::Exposure, 1.5);
//! ```
//!
//! Every effective change bumps [`RendererOptions::version`], so the frame
//! graph can rebuild only when something actually changed.

use bitflags::bitflags;

use crate::resources::version_tracker::ChangeTracker;

bitflags! {
    /// Render features that can be toggled at runtime.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        const BLOOM                   = 1 << 0;
        const VOLUMETRIC_LIGHTING     = 1 << 1;
        const HBAO                    = 1 << 2;
        const SCREEN_SPACE_SHADOWS    = 1 << 3;
        const SCREEN_SPACE_REFLECTIONS = 1 << 4;
        const ANTI_ALIASING_TAA       = 1 << 5;
        const ANTI_ALIASING_FXAA      = 1 << 6;
        const MOTION_BLUR             = 1 << 7;
        const SHARPENING_LUMA_SHARPEN = 1 << 8;
        const CHROMATIC_ABERRATION    = 1 << 9;
        const DITHERING               = 1 << 10;
        const INDIRECT_BOUNCE         = 1 << 11;
        const DEPTH_PREPASS           = 1 << 12;
        const REVERSE_Z               = 1 << 13;

        const DEBUG_TRANSFORM           = 1 << 16;
        const DEBUG_SELECTION_OUTLINE   = 1 << 17;
        const DEBUG_PHYSICS             = 1 << 18;
        const DEBUG_AABB                = 1 << 19;
        const DEBUG_LIGHTS              = 1 << 20;
        const DEBUG_PICKING_RAY         = 1 << 21;
        const DEBUG_GRID                = 1 << 22;
        const DEBUG_PERFORMANCE_METRICS = 1 << 23;
        const DEBUG_WIREFRAME           = 1 << 24;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::BLOOM
            | Self::VOLUMETRIC_LIGHTING
            | Self::HBAO
            | Self::SCREEN_SPACE_SHADOWS
            | Self::SCREEN_SPACE_REFLECTIONS
            | Self::ANTI_ALIASING_TAA
            | Self::MOTION_BLUR
            | Self::SHARPENING_LUMA_SHARPEN
            | Self::DEPTH_PREPASS
            | Self::REVERSE_Z
            | Self::DEBUG_TRANSFORM
            | Self::DEBUG_SELECTION_OUTLINE
            | Self::DEBUG_LIGHTS
            | Self::DEBUG_GRID
    }
}

/// Float-valued renderer tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionValue {
    Exposure,
    Gamma,
    BloomIntensity,
    MotionBlurIntensity,
    SharpenStrength,
    SharpenClamp,
    ShadowResolution,
    Tonemapping,
}

impl OptionValue {
    pub const COUNT: usize = 8;

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Tone mapping operator selected by [`OptionValue::Tonemapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tonemapping {
    Off,
    #[default]
    Aces,
    Reinhard,
    Uncharted2,
}

impl Tonemapping {
    pub const ALL: [Tonemapping; 4] = [Self::Off, Self::Aces, Self::Reinhard, Self::Uncharted2];

    /// Operator for a stored option value; out-of-range values clamp to the last operator.
    #[must_use]
    pub fn from_value(value: f32) -> Self {
        let index = (value.max(0.0) as usize).min(Self::ALL.len() - 1);
        Self::ALL[index]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Aces => "ACES",
            Self::Reinhard => "Reinhard",
            Self::Uncharted2 => "Uncharted 2",
        }
    }
}

/// Intermediate render target shown in place of the final frame.
///
/// Each target maps to one bit of the renderer's debug mask; `None` is `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderTargetDebug {
    #[default]
    None,
    GbufferAlbedo,
    GbufferNormal,
    GbufferMaterial,
    GbufferVelocity,
    GbufferDepth,
    BrdfPrefilteredEnvironment,
    BrdfSpecularLut,
    LightDiffuse,
    LightSpecular,
    LightVolumetric,
    CompositionHdr,
    CompositionHdr2,
    CompositionLdr,
    CompositionLdr2,
    Bloom,
    HbaoNoisy,
    Hbao,
    Ssr,
    TaaHistory,
}

impl RenderTargetDebug {
    /// Every entry in selector order.
    pub const ALL: [RenderTargetDebug; 20] = [
        Self::None,
        Self::GbufferAlbedo,
        Self::GbufferNormal,
        Self::GbufferMaterial,
        Self::GbufferVelocity,
        Self::GbufferDepth,
        Self::BrdfPrefilteredEnvironment,
        Self::BrdfSpecularLut,
        Self::LightDiffuse,
        Self::LightSpecular,
        Self::LightVolumetric,
        Self::CompositionHdr,
        Self::CompositionHdr2,
        Self::CompositionLdr,
        Self::CompositionLdr2,
        Self::Bloom,
        Self::HbaoNoisy,
        Self::Hbao,
        Self::Ssr,
        Self::TaaHistory,
    ];

    /// Debug mask bit: `0` for `None`, otherwise `1 << (index - 1)`.
    #[must_use]
    pub const fn flag(self) -> u64 {
        match self as u32 {
            0 => 0,
            index => 1 << (index - 1),
        }
    }

    /// Inverse of [`RenderTargetDebug::flag`]; anything that is not a single
    /// known bit maps to `None`.
    #[must_use]
    pub fn from_flag(flag: u64) -> Self {
        Self::ALL
            .into_iter()
            .find(|target| target.flag() == flag)
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::GbufferAlbedo => "Gbuffer_Albedo",
            Self::GbufferNormal => "Gbuffer_Normal",
            Self::GbufferMaterial => "Gbuffer_Material",
            Self::GbufferVelocity => "Gbuffer_Velocity",
            Self::GbufferDepth => "Gbuffer_Depth",
            Self::BrdfPrefilteredEnvironment => "Brdf_Prefiltered_Environment",
            Self::BrdfSpecularLut => "Brdf_Specular_Lut",
            Self::LightDiffuse => "Light_Diffuse",
            Self::LightSpecular => "Light_Specular",
            Self::LightVolumetric => "Light_Volumetric",
            Self::CompositionHdr => "Composition_Hdr",
            Self::CompositionHdr2 => "Composition_Hdr_2",
            Self::CompositionLdr => "Composition_Ldr",
            Self::CompositionLdr2 => "Composition_Ldr_2",
            Self::Bloom => "Bloom",
            Self::HbaoNoisy => "Hbao_Noisy",
            Self::Hbao => "Hbao",
            Self::Ssr => "Ssr",
            Self::TaaHistory => "TaaHistory",
        }
    }
}

pub const SHADOW_RESOLUTION_MIN: f32 = 128.0;
pub const SHADOW_RESOLUTION_MAX: f32 = 16384.0;

#[derive(Debug, Clone)]
pub struct RendererOptions {
    flags: RenderFlags,
    values: [f32; OptionValue::COUNT],
    render_target_debug: RenderTargetDebug,
    tracker: ChangeTracker,
}

impl Default for RendererOptions {
    fn default() -> Self {
        let mut values = [0.0; OptionValue::COUNT];
        values[OptionValue::Exposure.index()] = 1.0;
        values[OptionValue::Gamma.index()] = 2.2;
        values[OptionValue::BloomIntensity.index()] = 0.005;
        values[OptionValue::MotionBlurIntensity.index()] = 0.01;
        values[OptionValue::SharpenStrength.index()] = 1.0;
        values[OptionValue::SharpenClamp.index()] = 0.35;
        values[OptionValue::ShadowResolution.index()] = 4096.0;
        values[OptionValue::Tonemapping.index()] = Tonemapping::Aces as u32 as f32;

        Self {
            flags: RenderFlags::default(),
            values,
            render_target_debug: RenderTargetDebug::None,
            tracker: ChangeTracker::new(),
        }
    }
}

impl RendererOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Flags ────────────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn option(&self, flag: RenderFlags) -> bool {
        self.flags.contains(flag)
    }

    #[inline]
    #[must_use]
    pub fn flags(&self) -> RenderFlags {
        self.flags
    }

    /// Returns `true` if the flag changed.
    pub fn set_option(&mut self, flag: RenderFlags, enabled: bool) -> bool {
        if self.option(flag) == enabled {
            return false;
        }

        self.flags.set(flag, enabled);
        self.tracker.changed();
        log::debug!("Render option {flag:?} set to {enabled}");
        true
    }

    /// Indirect bounce reuses HBAO (diffuse) and SSR (specular) results, so
    /// it only takes effect when at least one of them is on.
    #[must_use]
    pub fn is_indirect_bounce_active(&self) -> bool {
        self.option(RenderFlags::INDIRECT_BOUNCE)
            && self.flags.intersects(RenderFlags::HBAO | RenderFlags::SCREEN_SPACE_REFLECTIONS)
    }

    // ── Values ───────────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn option_value(&self, option: OptionValue) -> f32 {
        self.values[option.index()]
    }

    #[must_use]
    pub fn tonemapping(&self) -> Tonemapping {
        Tonemapping::from_value(self.option_value(OptionValue::Tonemapping))
    }

    /// Stores `|value|`, clamped to the option's valid range.
    ///
    /// Returns `true` if the stored value changed. NaN is rejected.
    #[allow(clippy::float_cmp)]
    pub fn set_option_value(&mut self, option: OptionValue, value: f32) -> bool {
        if value.is_nan() {
            log::warn!("Ignoring NaN for render option {option:?}");
            return false;
        }

        let value = match option {
            OptionValue::ShadowResolution => value
                .abs()
                .round()
                .clamp(SHADOW_RESOLUTION_MIN, SHADOW_RESOLUTION_MAX),
            OptionValue::Tonemapping => Tonemapping::from_value(value.abs()) as u32 as f32,
            _ => value.abs(),
        };

        let slot = &mut self.values[option.index()];
        if *slot == value {
            return false;
        }

        *slot = value;
        self.tracker.changed();
        log::debug!("Render option {option:?} set to {value}");
        true
    }

    // ── Debug view ───────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn render_target_debug(&self) -> RenderTargetDebug {
        self.render_target_debug
    }

    /// Returns `true` if the selected target changed.
    pub fn set_render_target_debug(&mut self, target: RenderTargetDebug) -> bool {
        if self.render_target_debug == target {
            return false;
        }

        self.render_target_debug = target;
        self.tracker.changed();
        log::debug!("Render target debug set to {}", target.label());
        true
    }

    /// Incremented on every effective change.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.tracker.version()
    }
}
