use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A scored, platform-normalized course. Immutable after corpus build.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CourseRecord {
    title: String,
    url: String,
    platform: String,
    star_rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscribers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    #[serde(skip)]
    title_lower: String,
}

impl CourseRecord {
    pub fn new(title: String, url: String, platform: String, star_rating: u8) -> Self {
        let title_lower = title.to_lowercase();
        Self {
            title,
            url,
            platform,
            star_rating,
            subscribers: None,
            price: None,
            title_lower,
        }
    }

    pub fn with_subscribers(mut self, subscribers: u64) -> Self {
        self.subscribers = Some(subscribers);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub const fn star_rating(&self) -> u8 {
        self.star_rating
    }

    pub const fn subscribers(&self) -> Option<u64> {
        self.subscribers
    }

    pub const fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn is_free(&self) -> bool {
        matches!(self.price, Some(p) if p == 0.0)
    }

    /// Case-folded title, the haystack for all textual matching.
    pub fn title_lower(&self) -> &str {
        &self.title_lower
    }
}

/// A course row as handed over by a source, before scoring and
/// platform normalization.
#[derive(Debug, Clone, Default)]
pub struct RawCourse {
    pub title: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub subscribers: Option<u64>,
    pub price: Option<f64>,
}

/// One CSV row. The exports disagree on header names, hence the aliases.
#[derive(Debug, Deserialize)]
pub struct CsvCourseRow {
    #[serde(default, alias = "course_title")]
    pub title: Option<String>,
    #[serde(default, alias = "course_url", alias = "link")]
    pub url: Option<String>,
    #[serde(default, alias = "site", alias = "platform")]
    pub source: Option<String>,
    #[serde(default, alias = "num_subscribers")]
    pub subscribers: Option<u64>,
    #[serde(default)]
    pub price: Option<String>,
}

impl CsvCourseRow {
    pub fn into_raw(self) -> RawCourse {
        RawCourse {
            title: self.title.filter(|t| !t.trim().is_empty()).map(|t| t.trim().to_string()),
            url: self.url.filter(|u| !u.trim().is_empty()),
            source: self.source.filter(|s| !s.trim().is_empty()),
            subscribers: self.subscribers,
            price: self.price.as_deref().and_then(parse_price),
        }
    }
}

/// Lenient price parsing: "Free" and "0" mean free, anything
/// unparsable means the price is simply unknown.
fn parse_price(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.eq_ignore_ascii_case("free") || raw.eq_ignore_ascii_case("gratis") {
        return Some(0.0);
    }
    raw.trim_start_matches('$').parse().ok()
}

/// Coarse difficulty tag inferred from title keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Beginner,
    Intermediate,
}

impl FromStr for Level {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" | "principiante" | "principiantes" => Ok(Self::Beginner),
            "intermediate" | "intermedio" => Ok(Self::Intermediate),
            other => Err(AppError::ConfigError(format!(
                "unknown level '{other}', expected 'beginner' or 'intermediate'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_parsing_is_lenient() {
        assert_eq!(parse_price("Free"), Some(0.0));
        assert_eq!(parse_price("gratis"), Some(0.0));
        assert_eq!(parse_price("199.99"), Some(199.99));
        assert_eq!(parse_price("$19.99"), Some(19.99));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("TRUE"), None);
    }

    #[test]
    fn csv_row_blank_fields_become_none() {
        let row = CsvCourseRow {
            title: Some("   ".to_string()),
            url: Some(String::new()),
            source: None,
            subscribers: Some(12),
            price: Some("Free".to_string()),
        };
        let raw = row.into_raw();
        assert!(raw.title.is_none());
        assert!(raw.url.is_none());
        assert_eq!(raw.subscribers, Some(12));
        assert_eq!(raw.price, Some(0.0));
    }

    #[test]
    fn level_parses_both_languages() {
        assert_eq!("beginner".parse::<Level>().unwrap(), Level::Beginner);
        assert_eq!("Intermedio".parse::<Level>().unwrap(), Level::Intermediate);
        assert!("expert".parse::<Level>().is_err());
    }

    #[test]
    fn free_course_detection() {
        let free = CourseRecord::new("a".into(), "#".into(), "Udemy".into(), 3).with_price(0.0);
        let paid = CourseRecord::new("b".into(), "#".into(), "Udemy".into(), 3).with_price(10.0);
        let unknown = CourseRecord::new("c".into(), "#".into(), "Udemy".into(), 3);
        assert!(free.is_free());
        assert!(!paid.is_free());
        assert!(!unknown.is_free());
    }
}
