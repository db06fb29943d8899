//! Tolerance constants for dataset testing.

/// Floating point rounding errors (mixing, exact gain).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// 16-bit quantization step size, for signals read back from PCM16 WAVs.
pub const INT16_EPSILON: f32 = 1.0 / 32768.0;

/// Allowed difference between pixels rendered from rescaled signals.
/// Truncation to u8 can land one step either side.
pub const PIXEL_TOLERANCE: u8 = 1;
