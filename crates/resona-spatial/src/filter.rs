//! Filter parameter modulation.
//!
//! Maps the per-frame (blend, occlusion) pair to target parameters for
//! the six audio filters. The engine only computes parameters; the
//! filters' signal processing lives in the host's DSP chain.
//!
//! Each filter combines the two inputs differently to match its
//! perceptual goal: the low-pass uses a probabilistic OR so either high
//! blend or high occlusion alone darkens the sound, while echo wet-mix
//! and distortion use the product so both conditions must co-occur.

use serde::{Deserialize, Serialize};

use resona_common::{clamp01, lerp};

/// Low-pass filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowPassParams {
    /// Cutoff frequency in Hz.
    pub cutoff_hz: f32,
    /// Resonance Q.
    pub resonance_q: f32,
}

/// High-pass filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighPassParams {
    /// Cutoff frequency in Hz.
    pub cutoff_hz: f32,
    /// Resonance Q.
    pub resonance_q: f32,
}

/// Echo filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EchoParams {
    /// Delay in milliseconds.
    pub delay_ms: f32,
    /// Wet mix, 0..1.
    pub wet_mix: f32,
}

/// Distortion filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistortionParams {
    /// Distortion level, 0..1.
    pub level: f32,
}

/// Reverb filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbParams {
    /// Dry signal level in millibels.
    pub dry_level_mb: f32,
    /// Decay time in seconds.
    pub decay_time_s: f32,
    /// Early reflections level in millibels.
    pub reflections_level_mb: f32,
}

/// Chorus filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChorusParams {
    /// Wet mix, 0..1.
    pub wet_mix: f32,
    /// Modulation depth, 0..1.
    pub depth: f32,
    /// Modulation rate in Hz.
    pub rate_hz: f32,
}

/// Target parameters for the whole filter chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Low-pass filter.
    pub low_pass: LowPassParams,
    /// High-pass filter.
    pub high_pass: HighPassParams,
    /// Echo filter.
    pub echo: EchoParams,
    /// Distortion filter.
    pub distortion: DistortionParams,
    /// Reverb filter.
    pub reverb: ReverbParams,
    /// Chorus filter.
    pub chorus: ChorusParams,
}

impl Default for FilterParams {
    /// The neutral chain: everything computed at blend 0, occlusion 0.
    fn default() -> Self {
        compute_filter_params(0.0, 0.0)
    }
}

/// Computes filter parameters from the blend and occlusion factors.
///
/// Pure; no temporal smoothing happens at this layer.
#[must_use]
pub fn compute_filter_params(blend: f32, occlusion: f32) -> FilterParams {
    let blend = clamp01(blend);
    let occlusion = clamp01(occlusion);

    // Combinators, chosen per filter below.
    let mean = (blend + occlusion) * 0.5;
    let product = blend * occlusion;
    let prob_or = 1.0 - (1.0 - blend) * (1.0 - occlusion);

    FilterParams {
        low_pass: LowPassParams {
            // Cutoff drops when either distance or occlusion is high.
            cutoff_hz: lerp(22_000.0, 3_000.0, prob_or),
            resonance_q: lerp(1.0, 1.5, prob_or),
        },
        high_pass: HighPassParams {
            // Applied gently, or it chokes the sound.
            cutoff_hz: lerp(10.0, 500.0, occlusion * 0.1),
            resonance_q: lerp(2.0, 1.0, occlusion),
        },
        echo: EchoParams {
            // Shorter delay under occlusion, as if bouncing off close surfaces.
            delay_ms: lerp(500.0, 50.0, occlusion * 0.5),
            wet_mix: product,
        },
        distortion: DistortionParams { level: product },
        reverb: ReverbParams {
            dry_level_mb: lerp(0.0, -2_000.0, product),
            decay_time_s: lerp(0.1, 20.0, mean),
            reflections_level_mb: lerp(-10_000.0, 1_000.0, mean),
        },
        chorus: ChorusParams {
            wet_mix: lerp(0.0, 0.5, mean),
            depth: mean,
            rate_hz: lerp(0.8, 0.0, blend),
        },
    }
}
