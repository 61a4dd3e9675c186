//! Proximity zone classification
//!
//! Maps a filtered distance onto one of three zones, each tied to an
//! indicator LED. Boundary readings land in the closer zone so the display
//! never understates how near an obstacle is.

use defmt::Format;

/// Distances at or below this are in the near zone (red), in cm.
pub const NEAR_BOUNDARY_CM: f64 = 143.0;
/// Distances above the near boundary up to this are in the medium zone
/// (yellow), in cm. Beyond lies the far zone (green).
pub const FAR_BOUNDARY_CM: f64 = 160.0;

/// How close the nearest obstacle is.
#[derive(Debug, Clone, Copy, Format, PartialEq, Eq)]
pub enum ProximityZone {
    /// Obstacle closer than the near boundary, stop.
    Near,
    /// Obstacle between the boundaries, approach carefully.
    Medium,
    /// Clear beyond the far boundary.
    Far,
}

/// Classifies a filtered distance reading into its proximity zone.
pub fn classify(distance_cm: f64) -> ProximityZone {
    if distance_cm <= NEAR_BOUNDARY_CM {
        ProximityZone::Near
    } else if distance_cm <= FAR_BOUNDARY_CM {
        ProximityZone::Medium
    } else {
        ProximityZone::Far
    }
}
