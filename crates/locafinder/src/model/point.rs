//! Rentable location records.

use serde::{Deserialize, Deserializer};

use locafinder_net::{LngLat, de};

/// Highest rating value; ratings are clamped into `0..=MAX_RATING`.
pub const MAX_RATING: f64 = 5.0;

/// A rentable location as delivered by the point source.
///
/// Numeric columns tolerate numbers or numeric strings. A missing or
/// unparsable coordinate makes the point invisible on the map but it still
/// takes part in filtering and listings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Point {
    /// Identifier, unique within one snapshot of the store.
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_number")]
    pub lng: Option<f64>,
    /// Street address; also the categorical key of the address filter.
    #[serde(default, deserialize_with = "de::string_or_empty")]
    pub address: String,
    /// Category, e.g. "Shop" or "Office".
    #[serde(rename = "type", default, deserialize_with = "de::opt_text")]
    pub kind: Option<String>,
    /// Monthly price.
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub price: f64,
    /// Floor area in square metres.
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub area: f64,
    #[serde(rename = "desc", default, deserialize_with = "de::opt_text")]
    pub description: Option<String>,
    /// Image URL.
    #[serde(default, deserialize_with = "de::opt_text")]
    pub image: Option<String>,
    /// Number of previous rentals.
    #[serde(rename = "pre", default, deserialize_with = "count_or_zero")]
    pub popularity: u64,
    /// Rating in `0..=5`.
    #[serde(rename = "star", default, deserialize_with = "de::opt_number")]
    pub rating: Option<f64>,
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = de::opt_number(deserializer)?.unwrap_or(0.0);
    Ok(if value > 0.0 { value.round() as u64 } else { 0 })
}

impl Point {
    /// Create a point with only an identifier and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat: None,
            lng: None,
            address: String::new(),
            kind: None,
            price: 0.0,
            area: 0.0,
            description: None,
            image: None,
            popularity: 0,
            rating: None,
        }
    }

    /// Set the coordinate.
    pub fn at(mut self, lng: f64, lat: f64) -> Self {
        self.lng = Some(lng);
        self.lat = Some(lat);
        self
    }

    /// Set the address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the category.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the monthly price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the floor area.
    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    /// Set the popularity counter.
    pub fn with_popularity(mut self, popularity: u64) -> Self {
        self.popularity = popularity;
        self
    }

    /// Set the rating, clamped into range.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self.normalize_rating();
        self
    }

    /// The map coordinate, if both components are present and finite.
    pub fn coordinate(&self) -> Option<LngLat> {
        match (self.lng, self.lat) {
            (Some(lng), Some(lat)) => Some(LngLat::new(lng, lat)).filter(LngLat::is_finite),
            _ => None,
        }
    }

    /// Whether the point can be shown on the map.
    pub fn has_coordinate(&self) -> bool {
        self.coordinate().is_some()
    }

    /// The rating as a five-glyph star row.
    pub fn stars(&self) -> Option<StarRating> {
        self.rating.map(StarRating::from_value)
    }

    pub(crate) fn normalize_rating(&mut self) {
        self.rating = self
            .rating
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, MAX_RATING));
    }
}

/// A rating split into full, half and empty stars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: u8,
    pub empty: u8,
}

impl StarRating {
    /// Split a rating value. Out-of-range values are clamped.
    pub fn from_value(value: f64) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, MAX_RATING)
        } else {
            0.0
        };
        let full = value.floor();
        let half = u8::from(value - full >= 0.5);
        let full = full as u8;
        Self {
            full,
            half,
            empty: MAX_RATING as u8 - full - half,
        }
    }
}

impl std::fmt::Display for StarRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.full {
            f.write_str("★")?;
        }
        for _ in 0..self.half {
            f.write_str("⯪")?;
        }
        for _ in 0..self.empty {
            f.write_str("☆")?;
        }
        Ok(())
    }
}
