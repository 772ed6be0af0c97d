//! Beach safety verdicts derived from wave height and current descriptors.

/// Waves at or above this height (meters) make a beach unsafe.
pub const DANGEROUS_WAVE_HEIGHT: f64 = 1.5;

/// Current descriptors that make a beach unsafe when they appear anywhere in
/// the free-text `oceanCurrents` value.
pub const DANGEROUS_CURRENTS: &[&str] = &["Strong", "Moderate to Strong"];

/// Decide whether a beach is safe for swimming.
///
/// Current matching is case-sensitive substring containment, not equality, so
/// "Very Strong Undertow" is flagged through "Strong". Over-matching errs on
/// the unsafe side.
pub fn evaluate(wave_height: f64, ocean_currents: &str) -> bool {
    if wave_height >= DANGEROUS_WAVE_HEIGHT {
        return false;
    }
    !DANGEROUS_CURRENTS
        .iter()
        .any(|current| ocean_currents.contains(current))
}
