//! Output generators: RSS feed, sitemap, JSON data exports.
//!
//! Generators are consumers of the content store's query interface - they
//! never reach into the corpus internals. Each one drains the whole corpus
//! with a large page size and serializes its own format.

pub mod data;
pub mod rss;
pub mod sitemap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Page size that drains the entire corpus in one query.
pub(crate) const EXPORT_PAGE_SIZE: usize = 1000;

/// Parse a front-matter date: RFC 3339, or a plain `YYYY-MM-DD` taken as
/// midnight UTC.
pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| Utc.from_utc_datetime(&datetime))
}
