//! Market aggregates for the dashboard.

use std::sync::Arc;

use super::point::Point;

/// Label used when an address has no district segment.
pub const OTHER_DISTRICT: &str = "Other";

/// Headline numbers over a set of points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MarketSummary {
    pub count: usize,
    pub average_price: f64,
    pub average_area: f64,
    /// Sum of every point's popularity counter.
    pub total_views: u64,
}

impl MarketSummary {
    /// Compute the summary. An empty slice yields all zeros.
    pub fn compute(points: &[Arc<Point>]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let count = points.len();
        let total_price: f64 = points.iter().map(|p| p.price).sum();
        let total_area: f64 = points.iter().map(|p| p.area).sum();
        Self {
            count,
            average_price: total_price / count as f64,
            average_area: total_area / count as f64,
            total_views: points.iter().map(|p| p.popularity).sum(),
        }
    }
}

/// Average price within one district.
#[derive(Clone, Debug, PartialEq)]
pub struct DistrictPrice {
    pub district: String,
    /// Rounded to one decimal.
    pub average_price: f64,
    pub count: usize,
}

/// The district of an address: its last comma-separated segment, trimmed.
///
/// ```
/// use locafinder::model::district_of;
///
/// assert_eq!(district_of("12 Hang Bac, Hoan Kiem"), "Hoan Kiem");
/// assert_eq!(district_of(""), "Other");
/// ```
pub fn district_of(address: &str) -> &str {
    let last = address.rsplit(',').next().unwrap_or("").trim();
    if last.is_empty() { OTHER_DISTRICT } else { last }
}

/// Average price per district, in first-seen order.
pub fn average_price_by_district(points: &[Arc<Point>]) -> Vec<DistrictPrice> {
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();
    for point in points {
        let district = district_of(&point.address);
        match groups.iter_mut().find(|(d, _, _)| *d == district) {
            Some((_, total, count)) => {
                *total += point.price;
                *count += 1;
            }
            None => groups.push((district, point.price, 1)),
        }
    }
    groups
        .into_iter()
        .map(|(district, total, count)| DistrictPrice {
            district: district.to_string(),
            average_price: round1(total / count as f64),
            count,
        })
        .collect()
}

/// The `limit` most popular points, most popular first. Ties keep source order.
pub fn top_by_popularity(points: &[Arc<Point>], limit: usize) -> Vec<Arc<Point>> {
    let mut ranked = points.to_vec();
    ranked.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    ranked.truncate(limit);
    ranked
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
