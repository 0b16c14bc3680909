//! The filter engine.
//!
//! [`apply`] derives the filtered subset of a point snapshot. It is pure:
//! the output is an order-preserving subsequence of the input and applying
//! the same criteria twice changes nothing.
//!
//! # Unbounded ranges
//!
//! A range bound of `None` is the only "no limit" sentinel. `Some(0.0)` is
//! a real bound. Form controls that encode "no limit" as `0` go through
//! [`RangeFilter::from_control`], which is the single place that convention
//! is translated.

use std::sync::Arc;

use locafinder_core::PerfSpan;
use locafinder_core::logging::targets;

use super::point::Point;

/// Categorical match against a text field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextMatch {
    /// Every value matches, including a missing one.
    #[default]
    Any,
    /// Case-sensitive equality.
    Exact(String),
}

impl TextMatch {
    /// Translate a drop-down value, where the empty string means "any".
    pub fn from_control(value: &str) -> Self {
        if value.is_empty() {
            Self::Any
        } else {
            Self::Exact(value.to_string())
        }
    }

    /// Whether `value` satisfies this match. A missing value only matches `Any`.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => value == Some(expected.as_str()),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// Inclusive numeric range. `None` on either side means unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    /// A range with no bounds.
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    /// `min <= value <= max`. A range with `min > max` matches nothing.
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Translate numeric form controls that use `0` for "no limit".
    pub fn from_control(min: f64, max: f64) -> Self {
        let bound = |v: f64| (v != 0.0).then_some(v);
        Self {
            min: bound(min),
            max: bound(max),
        }
    }

    /// Whether `value` lies inside the range. NaN never satisfies a bound.
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// The user's filter choices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterCriteria {
    pub address: TextMatch,
    pub kind: TextMatch,
    pub area: RangeFilter,
    pub price: RangeFilter,
}

impl FilterCriteria {
    /// Criteria that match every point.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = TextMatch::Exact(address.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = TextMatch::Exact(kind.into());
        self
    }

    pub fn with_area(mut self, area: RangeFilter) -> Self {
        self.area = area;
        self
    }

    pub fn with_price(mut self, price: RangeFilter) -> Self {
        self.price = price;
        self
    }

    /// Whether no field constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        self.address.is_any()
            && self.kind.is_any()
            && self.area.is_unbounded()
            && self.price.is_unbounded()
    }

    /// Whether `point` satisfies all four predicates.
    pub fn matches(&self, point: &Point) -> bool {
        self.address.matches(Some(point.address.as_str()))
            && self.kind.matches(point.kind.as_deref())
            && self.area.contains(point.area)
            && self.price.contains(point.price)
    }
}

/// Apply `criteria` to `points`, preserving order.
pub fn apply(points: &[Arc<Point>], criteria: &FilterCriteria) -> Vec<Arc<Point>> {
    let _span = PerfSpan::new("filter_apply");
    let filtered: Vec<Arc<Point>> = points
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect();
    tracing::debug!(
        target: targets::FILTER,
        total = points.len(),
        matched = filtered.len(),
        "filter applied"
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Vec<Arc<Point>> {
        vec![
            Arc::new(
                Point::new("1", "A")
                    .at(105.0, 21.0)
                    .with_address("Hanoi")
                    .with_kind("Shop")
                    .with_price(5.0)
                    .with_area(30.0),
            ),
            Arc::new(
                Point::new("2", "B")
                    .at(106.0, 10.0)
                    .with_address("HCMC")
                    .with_kind("Office")
                    .with_price(8.0)
                    .with_area(60.0),
            ),
        ]
    }

    fn ids(points: &[Arc<Point>]) -> Vec<&str> {
        points.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_address_exact_match() {
        let out = apply(&sample(), &FilterCriteria::any().with_address("Hanoi"));
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn test_address_is_case_sensitive() {
        let out = apply(&sample(), &FilterCriteria::any().with_address("hanoi"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_price_range_excludes_all() {
        let out = apply(
            &sample(),
            &FilterCriteria::any().with_price(RangeFilter::between(0.0, 3.0)),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let out = apply(
            &sample(),
            &FilterCriteria::any().with_area(RangeFilter::between(100.0, 10.0)),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let out = apply(
            &sample(),
            &FilterCriteria::any().with_price(RangeFilter::between(5.0, 8.0)),
        );
        assert_eq!(ids(&out), vec!["1", "2"]);
    }

    #[test]
    fn test_missing_kind_only_matches_any() {
        let points = vec![Arc::new(Point::new("x", "X"))];
        assert_eq!(apply(&points, &FilterCriteria::any()).len(), 1);
        assert!(apply(&points, &FilterCriteria::any().with_kind("Shop")).is_empty());
    }

    #[test]
    fn test_zero_lower_bound_is_real() {
        let points = vec![Arc::new(Point::new("neg", "N").with_price(-1.0))];
        let strict = FilterCriteria::any().with_price(RangeFilter::at_least(0.0));
        assert!(apply(&points, &strict).is_empty());
    }

    #[test]
    fn test_from_control_zero_means_unbounded() {
        assert_eq!(RangeFilter::from_control(0.0, 0.0), RangeFilter::UNBOUNDED);
        assert_eq!(
            RangeFilter::from_control(0.0, 9999.0),
            RangeFilter::at_most(9999.0)
        );
        assert_eq!(TextMatch::from_control(""), TextMatch::Any);
    }

    #[test]
    fn test_nan_never_satisfies_bound() {
        assert!(!RangeFilter::at_least(1.0).contains(f64::NAN));
        assert!(RangeFilter::UNBOUNDED.contains(f64::NAN));
    }

    fn arb_point() -> impl Strategy<Value = Point> {
        (
            "[a-z]{1,4}",
            prop::sample::select(vec!["Hanoi", "HCMC", "Da Nang", ""]),
            prop::option::of(prop::sample::select(vec!["Shop", "Office"])),
            0.0f64..50.0,
            0.0f64..200.0,
        )
            .prop_map(|(id, address, kind, price, area)| {
                let mut p = Point::new(id, "p")
                    .with_address(address)
                    .with_price(price)
                    .with_area(area);
                p.kind = kind.map(str::to_string);
                p
            })
    }

    fn arb_text() -> impl Strategy<Value = TextMatch> {
        prop_oneof![
            Just(TextMatch::Any),
            prop::sample::select(vec!["Hanoi", "HCMC", "Shop", "Office"])
                .prop_map(|s| TextMatch::Exact(s.to_string())),
        ]
    }

    fn arb_range() -> impl Strategy<Value = RangeFilter> {
        (prop::option::of(0.0f64..200.0), prop::option::of(0.0f64..200.0))
            .prop_map(|(min, max)| RangeFilter { min, max })
    }

    fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
        (arb_text(), arb_text(), arb_range(), arb_range()).prop_map(
            |(address, kind, area, price)| FilterCriteria {
                address,
                kind,
                area,
                price,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_output_is_ordered_subsequence(
            points in prop::collection::vec(arb_point(), 0..30),
            criteria in arb_criteria(),
        ) {
            let points: Vec<Arc<Point>> = points.into_iter().map(Arc::new).collect();
            let out = apply(&points, &criteria);
            let mut cursor = points.iter();
            for kept in &out {
                prop_assert!(cursor.any(|p| Arc::ptr_eq(p, kept)));
            }
        }

        #[test]
        fn prop_every_output_matches(
            points in prop::collection::vec(arb_point(), 0..30),
            criteria in arb_criteria(),
        ) {
            let points: Vec<Arc<Point>> = points.into_iter().map(Arc::new).collect();
            for p in apply(&points, &criteria) {
                prop_assert!(criteria.address.matches(Some(p.address.as_str())));
                prop_assert!(criteria.kind.matches(p.kind.as_deref()));
                prop_assert!(criteria.area.contains(p.area));
                prop_assert!(criteria.price.contains(p.price));
            }
        }

        #[test]
        fn prop_unconstrained_is_identity(points in prop::collection::vec(arb_point(), 0..30)) {
            let points: Vec<Arc<Point>> = points.into_iter().map(Arc::new).collect();
            let out = apply(&points, &FilterCriteria::any());
            prop_assert_eq!(out.len(), points.len());
            prop_assert!(out.iter().zip(&points).all(|(a, b)| Arc::ptr_eq(a, b)));
        }

        #[test]
        fn prop_idempotent(
            points in prop::collection::vec(arb_point(), 0..30),
            criteria in arb_criteria(),
        ) {
            let points: Vec<Arc<Point>> = points.into_iter().map(Arc::new).collect();
            let once = apply(&points, &criteria);
            let twice = apply(&once, &criteria);
            prop_assert_eq!(once, twice);
        }
    }
}
