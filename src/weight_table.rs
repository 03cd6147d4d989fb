//! Per-ring upper-arm weights for each weighting case.
//!
//! This module is included by both the build script and the weights module
//! so the table is validated at compile time exactly as it is used.

/// Rings covered by one profile
pub const PROFILE_RINGS: usize = 21;

/// Number of weighting cases
pub const PROFILE_COUNT: usize = 5;

/// Index of the case that zeroes both weights instead of using `1 - w`
pub const DEGENERATE_PROFILE: usize = 3;

/// Upper-arm weight per ring; the lower arm gets `1 - w`.
#[rustfmt::skip]
pub const WEIGHT_PROFILES: [[f32; PROFILE_RINGS]; PROFILE_COUNT] = [
    // Case 1: linear ramp along the whole tube
    [0.00, 0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40, 0.45, 0.50,
     0.55, 0.60, 0.65, 0.70, 0.75, 0.80, 0.85, 0.90, 0.95, 1.00],
    // Case 2: ramp across the middle third
    [0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 0.10, 0.25, 0.30, 0.45, 0.50,
     0.65, 0.70, 0.85, 0.90, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00],
    // Case 3: short ramp around the elbow
    [0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 0.20, 0.30, 0.40,
     0.50, 0.60, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00],
    // Case 4: no influence from either bone
    [0.00; PROFILE_RINGS],
    // Case 5: upper arm only
    [1.00; PROFILE_RINGS],
];
