//! Tolerance constants for pitch testing.

/// Floating point rounding errors.
/// Use for values that should survive serialization or averaging exactly.
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Sine estimates at 16 kHz. The lag search is integer, so a tone between
/// two lags snaps to the nearer one; at 220 Hz adjacent lags are ~3 Hz apart.
pub const PITCH_TOLERANCE_HZ: f32 = 5.0;

/// Live estimates from a ring-buffer window of a clean sine.
pub const LIVE_PITCH_TOLERANCE_HZ: f32 = 6.0;
