//! Erosion risk classification.
//!
//! A static threshold cascade over the magnitude of percentage change and
//! annual change rate. Gains and losses of the same size get the same tier.

use shoreline_analysis_models::{RiskAssessment, RiskLevel};

/// Thresholds for one tier. A tier matches when either magnitude is
/// strictly greater than its threshold.
struct Tier {
    level: RiskLevel,
    percentage: f64,
    annual_rate: f64,
    factors: &'static [&'static str],
    recommendations: &'static [&'static str],
}

/// Tiers in descending severity; the first match wins.
const TIERS: &[Tier] = &[
    Tier {
        level: RiskLevel::Critical,
        percentage: 10.0,
        annual_rate: 0.5,
        factors: &["Severe coastline erosion", "High annual loss rate"],
        recommendations: &[
            "Immediate coastal protection measures required",
            "Emergency assessment and monitoring",
            "Community relocation planning may be necessary",
        ],
    },
    Tier {
        level: RiskLevel::High,
        percentage: 5.0,
        annual_rate: 0.2,
        factors: &["Significant coastline changes", "Accelerating erosion"],
        recommendations: &[
            "Implement coastal protection strategies",
            "Regular monitoring and assessment",
            "Community awareness and preparedness",
        ],
    },
    Tier {
        level: RiskLevel::Medium,
        percentage: 2.0,
        annual_rate: 0.1,
        factors: &["Moderate coastline erosion"],
        recommendations: &[
            "Monitor coastline changes regularly",
            "Consider preventive measures",
            "Engage local communities in monitoring",
        ],
    },
];

const STABLE_FACTORS: &[&str] = &["Stable coastline conditions"];
const STABLE_RECOMMENDATIONS: &[&str] = &[
    "Continue regular monitoring",
    "Maintain existing coastal management practices",
];

/// Classifies a comparison from its percentage change and average annual
/// change (km²/year).
#[must_use]
pub fn classify(percentage_change: f64, average_annual_change: f64) -> RiskAssessment {
    let percentage = percentage_change.abs();
    let rate = average_annual_change.abs();

    TIERS
        .iter()
        .find(|tier| percentage > tier.percentage || rate > tier.annual_rate)
        .map_or_else(
            || assessment(RiskLevel::Low, STABLE_FACTORS, STABLE_RECOMMENDATIONS),
            |tier| assessment(tier.level, tier.factors, tier.recommendations),
        )
}

fn assessment(level: RiskLevel, factors: &[&str], recommendations: &[&str]) -> RiskAssessment {
    RiskAssessment {
        level,
        factors: factors.iter().map(ToString::to_string).collect(),
        recommendations: recommendations.iter().map(ToString::to_string).collect(),
    }
}
