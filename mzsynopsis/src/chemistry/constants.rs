//! Physical constants used throughout the mass calculations, all in Dalton.

/// The mass of a proton
pub const MASS_PROTON: f64 = 1.007_276_49;
/// The mass difference between a ¹³C and a ¹²C atom
pub const MASS_C13_DELTA: f64 = 1.003_354_83;

/// Monoisotopic mass of ¹²C
pub const MASS_CARBON: f64 = 12.0;
/// Monoisotopic mass of ¹H
pub const MASS_HYDROGEN: f64 = 1.007_825_032_07;
/// Monoisotopic mass of ¹⁴N
pub const MASS_NITROGEN: f64 = 14.003_074_004_8;
/// Monoisotopic mass of ¹⁶O
pub const MASS_OXYGEN: f64 = 15.994_914_619_56;
/// Monoisotopic mass of ³²S
pub const MASS_SULFUR: f64 = 31.972_071;
/// Monoisotopic mass of ⁸⁰Se
pub const MASS_SELENIUM: f64 = 79.916_521_3;

/// The hydroxyl group closing off the C terminus
pub const MASS_HYDROXYL: f64 = MASS_OXYGEN + MASS_HYDROGEN;
/// Water, the sum of both default terminal groups
pub const MASS_WATER: f64 = MASS_HYDROXYL + MASS_HYDROGEN;

/// Delta masses above this value (in Dalton) are assumed to be caused by the wrong isotope being picked
pub const ISOTOPE_CORRECTION_LIMIT: f64 = 0.5;
