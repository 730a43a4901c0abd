//! Periodic waveform primitives for procedural animation.
//!
//! All functions here are pure and stateless. The "spaced" family produces
//! signals that stay flat for `w` seconds out of every `w + a` second period
//! and are active for the remaining `a` seconds, which is what gives the
//! figures their hold-then-snap gestures (jaw opening, head tilts).

use std::f32::consts::PI;

/// Periodic function linearly going from 0 to 1 with period 1.
pub fn sawtooth(t: f32) -> f32 {
    t - t.floor()
}

/// Returns 0.0 for `w` seconds, then 1.0 for `a` seconds, repeating.
///
/// The comparison is strict, so a sample landing exactly on the window
/// boundary still reads as quiet.
pub fn spaced_rect(t: f32, w: f32, a: f32) -> f32 {
    if sawtooth(t / (w + a)) > w / (w + a) { 1.0 } else { 0.0 }
}

/// Returns 0.0 for `w` seconds, then a sawtooth rescaled to [0, 1) over the
/// `a`-second active window, repeating.
pub fn spaced_sawtooth(x: f32, w: f32, a: f32) -> f32 {
    spaced_rect(x, w, a) * sawtooth((x - w) / (w + a)) * ((w + a) / a)
}

/// Returns 0.0 for `w` seconds, then sweeps a full cosine period (starting
/// at `cos(pi/2) = 0`) over the `a`-second active window, repeating.
pub fn spaced_cos(x: f32, w: f32, a: f32) -> f32 {
    (2.0 * PI * spaced_sawtooth(x, w, a) + PI / 2.0).cos()
}
