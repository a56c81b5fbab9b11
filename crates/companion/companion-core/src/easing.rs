//! Easing and oscillation helpers:
//! - lerp (scalar linear interpolation)
//! - ease_in_out_quad (symmetric quadratic timing)
//! - float_offset / breath_scale (idle motion)
//! - wing_flap (flight rotation)
//! - peck_phase / peck_offset / peck_tilt (eat motion)
//!
//! All functions are pure; callers own the elapsed-time counters.

use std::f32::consts::PI;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Quadratic ease-in-out. Input is clamped to [0,1]; output is monotonic
/// with exact endpoints `0 -> 0` and `1 -> 1`.
#[inline]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}

/// Vertical floating offset.
#[inline]
pub fn float_offset(elapsed: f32, amplitude: f32, speed: f32) -> f32 {
    amplitude * (elapsed * speed).sin()
}

/// Area-preserving squash/stretch: returns `(sx, sy)` with `sx * sy == 1`.
#[inline]
pub fn breath_scale(elapsed: f32, amplitude: f32, speed: f32) -> (f32, f32) {
    let s = 1.0 + amplitude * (elapsed * speed).sin();
    (s, s.recip())
}

#[inline]
pub fn wing_flap(elapsed_ms: f32, amplitude: f32, speed: f32) -> f32 {
    amplitude * (elapsed_ms * speed).sin()
}

#[inline]
pub fn peck_phase(elapsed_ms: f32, period_ms: f32) -> f32 {
    elapsed_ms / period_ms * PI
}

/// Pull-back distance for a peck; never negative, zero at every half cycle.
/// The amplitude decays linearly by `decay` over `duration_ms`.
#[inline]
pub fn peck_offset(phase: f32, elapsed_ms: f32, duration_ms: f32, amplitude: f32, decay: f32) -> f32 {
    let amp = amplitude * (1.0 - decay * elapsed_ms / duration_ms);
    phase.sin().abs() * amp
}

#[inline]
pub fn peck_tilt(phase: f32, amplitude: f32) -> f32 {
    amplitude * phase.sin()
}
