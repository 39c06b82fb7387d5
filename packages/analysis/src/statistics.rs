//! Aggregate statistics over stored analyses and coastlines.

use std::collections::{BTreeMap, BTreeSet};

use shoreline_analysis_models::{
    Analysis, LocationSummary, RegionStats, RiskLevel, StatisticsOverview,
};
use shoreline_coastline_models::Coastline;

#[derive(Default)]
struct RegionAccumulator {
    count: u64,
    total_loss: f64,
    percentage_sum: f64,
}

/// Summarizes a set of analyses, with a per-region breakdown sorted by
/// total land loss (largest first, ties by region name).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn overview(analyses: &[Analysis]) -> StatisticsOverview {
    let mut regions: BTreeMap<&str, RegionAccumulator> = BTreeMap::new();
    let mut overview = StatisticsOverview::default();
    let mut annual_sum = 0.0;

    for analysis in analyses {
        let results = &analysis.results;

        overview.total_analyses += 1;
        overview.total_land_loss += results.land_loss_area;
        overview.total_land_gain += results.land_gain_area;
        annual_sum += results.average_annual_change;

        match analysis.risk_assessment.level {
            RiskLevel::Critical => overview.critical_areas += 1,
            RiskLevel::High => overview.high_risk_areas += 1,
            RiskLevel::Medium | RiskLevel::Low => {}
        }

        let region = regions
            .entry(analysis.location.region.as_str())
            .or_default();
        region.count += 1;
        region.total_loss += results.land_loss_area;
        region.percentage_sum += results.percentage_change;
    }

    if overview.total_analyses > 0 {
        overview.average_annual_change = Some(annual_sum / overview.total_analyses as f64);
    }

    let mut by_region: Vec<RegionStats> = regions
        .into_iter()
        .map(|(region, acc)| RegionStats {
            region: region.to_string(),
            analysis_count: acc.count,
            total_loss: acc.total_loss,
            average_percentage_change: acc.percentage_sum / acc.count as f64,
        })
        .collect();

    // Stable sort keeps the BTreeMap's name order for equal losses.
    by_region.sort_by(|a, b| b.total_loss.total_cmp(&a.total_loss));
    overview.by_region = by_region;

    overview
}

/// Groups coastlines by region, province, and municipality, sorted by
/// those names.
#[must_use]
pub fn location_summary(coastlines: &[Coastline]) -> Vec<LocationSummary> {
    let mut groups: BTreeMap<(&str, &str, &str), (u64, BTreeSet<i32>)> = BTreeMap::new();

    for coastline in coastlines {
        let location = &coastline.location;
        let (count, years) = groups
            .entry((
                location.region.as_str(),
                location.province.as_str(),
                location.municipality.as_str(),
            ))
            .or_default();
        *count += 1;
        years.insert(coastline.year);
    }

    groups
        .into_iter()
        .filter_map(|((region, province, municipality), (count, years))| {
            Some(LocationSummary {
                region: region.to_string(),
                province: province.to_string(),
                municipality: municipality.to_string(),
                count,
                min_year: *years.first()?,
                max_year: *years.last()?,
                years: years.into_iter().collect(),
            })
        })
        .collect()
}
