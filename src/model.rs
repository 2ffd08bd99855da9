// Core structs: RawListing, Listing
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::identifier::CarIdentifier;
use crate::normalizer::refine_title;
use crate::numeric::parse_unit_value;

pub const MIN_YEAR: i32 = 1990;
pub const MAX_YEAR: i32 = 2026;

/// A price or mileage field as it comes off the page: sometimes already
/// numeric, usually a string with unit noise ("5萬公里").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

/// Unvalidated listing fields as extracted from one row of a listing page.
#[derive(Debug, Clone)]
pub struct RawListing {
    pub source: String,
    pub external_id: String,
    pub link: String,
    pub original_title: String,
    pub price: Option<RawNumber>,
    pub mileage: Option<RawNumber>,
    pub year: i32,
    pub location: String,
}

/// A validated listing, ready for upsert. `processed_title`, `brand` and
/// `series` are derived from `original_title` during `build` and never
/// caller-supplied, so they cannot drift out of sync with the raw title.
#[derive(Debug, Clone)]
pub struct Listing {
    pub source: String,
    pub external_id: String,
    pub link: String,
    pub year: i32,
    pub price: f64,
    pub mileage: f64,
    pub original_title: String,
    pub processed_title: String,
    pub brand: String,
    pub series: String,
    pub location: String,
    pub crawled_at: DateTime<Utc>,
}

impl Listing {
    /// Validates raw fields and assembles the final record. Rejecting one
    /// listing never affects the rest of the batch; the caller logs and
    /// moves on.
    pub fn build(raw: RawListing, identifier: &CarIdentifier) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("source", &raw.source),
            ("external_id", &raw.external_id),
            ("link", &raw.link),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        if raw.year < MIN_YEAR || raw.year > MAX_YEAR {
            return Err(ValidationError::YearOutOfRange(raw.year));
        }

        // String parsing cannot produce negatives; only numeric input can.
        let price = parse_unit_value(raw.price.as_ref());
        if price < 0.0 {
            return Err(ValidationError::NegativeValue {
                field: "price",
                value: price,
            });
        }
        let mileage = parse_unit_value(raw.mileage.as_ref());
        if mileage < 0.0 {
            return Err(ValidationError::NegativeValue {
                field: "mileage",
                value: mileage,
            });
        }

        let processed_title = refine_title(&raw.original_title);
        let (brand, series) = identifier.identify(&processed_title);

        Ok(Self {
            source: raw.source,
            external_id: raw.external_id,
            link: raw.link,
            year: raw.year,
            price,
            mileage,
            original_title: raw.original_title,
            processed_title,
            brand,
            series,
            location: raw.location,
            crawled_at: Utc::now(),
        })
    }
}

/// One page to fetch from the listing index.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub page: u32,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("year {0} out of valid range [{MIN_YEAR}, {MAX_YEAR}]")]
    YearOutOfRange(i32),
    #[error("{field} is negative: {value}")]
    NegativeValue { field: &'static str, value: f64 },
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("http error: {0}")]
    HttpError(String),
    #[error("unexpected response status: {0}")]
    InvalidResponse(u16),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("html parse error: {0}")]
    HtmlParseError(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
