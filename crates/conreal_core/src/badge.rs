//! Reality badge banding and formatting.
//!
//! Kept apart from the fragmentation engine: the engine returns a number,
//! this module decides how that number is shown as user flair.

use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the stable band.
pub const STABLE_BELOW: f64 = 0.3;
/// Upper bound (inclusive) of the fluctuating band.
pub const FLUCTUATING_UP_TO: f64 = 0.7;
/// Scores above this are reported as a reality fracture.
pub const FRACTURE_ABOVE: f64 = 0.5;

/// Display band of a fragmentation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealityBand {
    Stable,
    Fluctuating,
    Chaotic,
}

impl RealityBand {
    /// `< 0.3` stable, `0.3..=0.7` fluctuating, `> 0.7` chaotic.
    pub fn from_fragmentation(fragmentation: f64) -> Self {
        if fragmentation < STABLE_BELOW {
            Self::Stable
        } else if fragmentation <= FLUCTUATING_UP_TO {
            Self::Fluctuating
        } else {
            Self::Chaotic
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Stable => "#22C55E",
            Self::Fluctuating => "#FBBF24",
            Self::Chaotic => "#EF4444",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Fluctuating => "fluctuating",
            Self::Chaotic => "chaotic",
        }
    }
}

/// Flair text and color derived from a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealityBadge {
    pub text: String,
    pub background_color: String,
    pub band: RealityBand,
}

impl RealityBadge {
    pub fn for_fragmentation(fragmentation: f64) -> Self {
        let band = RealityBand::from_fragmentation(fragmentation);
        Self {
            text: format!("Reality Index: {}", format_index(fragmentation)),
            background_color: band.color().to_string(),
            band,
        }
    }
}

/// Two-decimal rendering used in flair text and reports.
pub fn format_index(fragmentation: f64) -> String {
    format!("{fragmentation:.2}")
}

pub fn is_fracture(fragmentation: f64) -> bool {
    fragmentation > FRACTURE_ABOVE
}

#[cfg(test)]
mod tests {
    use super::{format_index, is_fracture, RealityBadge, RealityBand};

    #[test]
    fn band_edges_follow_thresholds() {
        assert_eq!(RealityBand::from_fragmentation(0.0), RealityBand::Stable);
        assert_eq!(RealityBand::from_fragmentation(0.299), RealityBand::Stable);
        assert_eq!(RealityBand::from_fragmentation(0.3), RealityBand::Fluctuating);
        assert_eq!(RealityBand::from_fragmentation(0.7), RealityBand::Fluctuating);
        assert_eq!(RealityBand::from_fragmentation(0.701), RealityBand::Chaotic);
        assert_eq!(RealityBand::from_fragmentation(1.0), RealityBand::Chaotic);
    }

    #[test]
    fn badge_text_uses_two_decimals() {
        let badge = RealityBadge::for_fragmentation(0.2761);
        assert_eq!(badge.text, "Reality Index: 0.28");
        assert_eq!(badge.background_color, "#22C55E");

        let badge = RealityBadge::for_fragmentation(1.0);
        assert_eq!(badge.text, "Reality Index: 1.00");
        assert_eq!(badge.band, RealityBand::Chaotic);
    }

    #[test]
    fn fracture_is_strictly_above_half() {
        assert!(!is_fracture(0.5));
        assert!(is_fracture(0.51));
        assert_eq!(format_index(0.0), "0.00");
    }
}
