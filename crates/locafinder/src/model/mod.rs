//! Data model: points, the point store, the filter engine and market aggregates.

mod filter;
mod point;
mod store;
mod summary;

pub use filter::{FilterCriteria, RangeFilter, TextMatch, apply};
pub use point::{MAX_RATING, Point, StarRating};
pub use store::PointStore;
pub(crate) use store::is_derived_id;
pub use summary::{
    DistrictPrice, MarketSummary, OTHER_DISTRICT, average_price_by_district, district_of,
    top_by_popularity,
};
