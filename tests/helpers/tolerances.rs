//! Tolerance constants for playback tests.

/// Volume comparisons after a few float multiplications.
pub const VOLUME_EPSILON: f32 = 1e-5;

/// Clock and position comparisons. Tick sizes used by the fixtures are
/// exact binary fractions, so positions only drift by rounding.
pub const TIME_EPSILON: f64 = 1e-9;
