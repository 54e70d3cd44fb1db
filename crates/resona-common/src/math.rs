//! Small math helpers shared across the engine.

/// Linear interpolation between `a` and `b` by `t` (unclamped).
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps a value into `[0.0, 1.0]`.
#[must_use]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Inverse lerp: where `value` sits between `a` and `b`, clamped to `[0, 1]`.
///
/// Returns 0.0 when the range is degenerate (`a == b`).
#[must_use]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        0.0
    } else {
        clamp01((value - a) / (b - a))
    }
}

/// Moves `current` toward `target` with an exponential approach.
///
/// `smooth_time` is the time constant in seconds; smaller values converge
/// faster. A non-positive `smooth_time` snaps to the target.
#[must_use]
pub fn smooth_approach(current: f32, target: f32, smooth_time: f32, dt: f32) -> f32 {
    if smooth_time <= 0.0 || dt <= 0.0 {
        return target;
    }
    let alpha = 1.0 - (-dt / smooth_time).exp();
    current + (target - current) * alpha
}

/// Draws a uniform random value from `[min, max]`.
///
/// An inverted range is treated as the single point `min`.
#[must_use]
pub fn random_in_range(min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    lerp(min, max, fastrand::f32())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert!((lerp(0.0, 10.0, 0.0) - 0.0).abs() < f32::EPSILON);
        assert!((lerp(0.0, 10.0, 1.0) - 10.0).abs() < f32::EPSILON);
        assert!((lerp(0.5, 1.0, 0.2) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_clamp01() {
        assert!((clamp01(-1.0) - 0.0).abs() < f32::EPSILON);
        assert!((clamp01(2.0) - 1.0).abs() < f32::EPSILON);
        assert!((clamp01(0.3) - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_inverse_lerp_degenerate() {
        assert!((inverse_lerp(5.0, 5.0, 7.0) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_smooth_approach_converges() {
        let mut v = 0.0;
        for _ in 0..100 {
            v = smooth_approach(v, 1.0, 0.1, 0.016);
        }
        assert!((v - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_smooth_approach_snaps_without_time_constant() {
        assert!((smooth_approach(0.0, 1.0, 0.0, 0.016) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_random_in_range_bounds() {
        for _ in 0..50 {
            let v = random_in_range(0.8, 1.2);
            assert!((0.8..=1.2).contains(&v));
        }
        assert!((random_in_range(1.0, 1.0) - 1.0).abs() < f32::EPSILON);
        // Inverted range collapses to min
        assert!((random_in_range(2.0, 1.0) - 2.0).abs() < f32::EPSILON);
    }
}
