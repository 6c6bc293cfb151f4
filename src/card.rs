//! BookCard struct - the validated structured output of a generation call.

use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Accent used when the model returns something that is not a hex colour (`#A855F7`).
pub const DEFAULT_ACCENT: (u8, u8, u8) = (0xA8, 0x55, 0xF7);

/// Minimum number of detailed analysis pages a card must carry.
pub const MIN_ANALYSIS_PAGES: usize = 3;

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#([0-9A-Fa-f]{3}){1,2}$").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),
    #[error("field `{0}` is empty")]
    EmptyField(&'static str),
    #[error("detailed analysis has {0} pages, expected at least 3")]
    TooFewAnalysisPages(usize),
}

/// Structured summary of a single book.
///
/// Field docs end up in the JSON schema handed to the model, so they double as
/// per-field writing guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCard {
    /// Full title of the book
    pub title: String,
    /// Name of the author
    pub author: String,
    /// Concise, engaging summary of the book, about 50-70 words
    pub summary: String,
    /// Three key ideas or lessons from the book
    pub takeaways: Vec<String>,
    /// An inspiring or thought-provoking quote from the book
    pub quote: String,
    /// One hex colour code such as #4A90E2 reflecting the mood, theme or cover
    pub theme_color: String,
    /// Exactly three in-depth passages of about 80-100 words each: themes,
    /// character development, and how the plot resolves
    pub detailed_analysis: Vec<String>,
}

impl BookCard {
    /// Decode a generically parsed payload, failing closed on any shape mismatch.
    pub fn from_value(value: Value) -> Result<Self, CardError> {
        let Value::Object(map) = value else {
            return Err(CardError::NotAnObject);
        };

        let card = Self {
            title: required_str(&map, "title")?,
            author: optional_str(&map, "author")?,
            summary: required_str(&map, "summary")?,
            takeaways: str_list(&map, "takeaways")?,
            quote: required_str(&map, "quote")?,
            theme_color: required_str(&map, "themeColor")?,
            detailed_analysis: str_list(&map, "detailedAnalysis")?,
        };
        card.validate()?;
        Ok(card)
    }

    /// Check the card invariant on an already typed value.
    pub fn validate(&self) -> Result<(), CardError> {
        let required = [
            ("title", &self.title),
            ("summary", &self.summary),
            ("quote", &self.quote),
            ("themeColor", &self.theme_color),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(CardError::EmptyField(name));
            }
        }
        if self.detailed_analysis.len() < MIN_ANALYSIS_PAGES {
            return Err(CardError::TooFewAnalysisPages(self.detailed_analysis.len()));
        }
        Ok(())
    }

    /// Accent colour for rendering; invalid theme colours fall back to [`DEFAULT_ACCENT`].
    pub fn accent_rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(&self.theme_color).unwrap_or(DEFAULT_ACCENT)
    }
}

/// Parse `#RGB` or `#RRGGBB` into its components.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    if !HEX_COLOR.is_match(value) {
        return None;
    }

    let digits = &value[1..];
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    if digits.len() == 3 {
        let mut parts = digits.chars().map(|c| channel(&format!("{c}{c}")));
        Some((parts.next()??, parts.next()??, parts.next()??))
    } else {
        Some((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ))
    }
}

fn required_str(map: &Map<String, Value>, field: &'static str) -> Result<String, CardError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(CardError::MissingField(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(CardError::EmptyField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(CardError::WrongType(field)),
    }
}

fn optional_str(map: &Map<String, Value>, field: &'static str) -> Result<String, CardError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(CardError::WrongType(field)),
    }
}

fn str_list(map: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, CardError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(CardError::MissingField(field)),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(CardError::WrongType(field))
            })
            .collect(),
        Some(_) => Err(CardError::WrongType(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "summary": "A desert planet, a prophecy and a spice everyone wants.",
            "takeaways": ["Fear is the mind-killer", "Ecology is power", "Beware messiahs"],
            "quote": "The mystery of life isn't a problem to solve.",
            "themeColor": "#C2A15B",
            "detailedAnalysis": ["Themes", "Characters", "Ending"]
        })
    }

    #[test]
    fn test_from_value_accepts_complete_card() {
        let card = BookCard::from_value(sample()).unwrap();
        assert_eq!(card.title, "Dune");
        assert_eq!(card.takeaways.len(), 3);
        assert_eq!(card.detailed_analysis[2], "Ending");
    }

    #[test]
    fn test_missing_quote_is_rejected() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("quote");
        assert_eq!(
            BookCard::from_value(value),
            Err(CardError::MissingField("quote"))
        );
    }

    #[test]
    fn test_blank_summary_is_rejected() {
        let mut value = sample();
        value["summary"] = json!("   ");
        assert_eq!(
            BookCard::from_value(value),
            Err(CardError::EmptyField("summary"))
        );
    }

    #[test]
    fn test_short_analysis_is_rejected() {
        let mut value = sample();
        value["detailedAnalysis"] = json!(["only", "two"]);
        assert_eq!(
            BookCard::from_value(value),
            Err(CardError::TooFewAnalysisPages(2))
        );
    }

    #[test]
    fn test_non_string_takeaway_is_wrong_type() {
        let mut value = sample();
        value["takeaways"] = json!(["fine", 42]);
        assert_eq!(
            BookCard::from_value(value),
            Err(CardError::WrongType("takeaways"))
        );
    }

    #[test]
    fn test_missing_author_decodes_as_empty() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("author");
        let card = BookCard::from_value(value).unwrap();
        assert!(card.author.is_empty());
    }

    #[test]
    fn test_array_payload_is_not_an_object() {
        assert_eq!(
            BookCard::from_value(json!([1, 2, 3])),
            Err(CardError::NotAnObject)
        );
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#4A90E2"), Some((0x4A, 0x90, 0xE2)));
        assert_eq!(parse_hex_color("#fff"), Some((0xFF, 0xFF, 0xFF)));
        assert_eq!(parse_hex_color("#a1b"), Some((0xAA, 0x11, 0xBB)));
        assert_eq!(parse_hex_color("not-a-color"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("4A90E2"), None);
    }

    #[test]
    fn test_accent_falls_back_to_default() {
        let mut card = BookCard::from_value(sample()).unwrap();
        card.theme_color = "not-a-color".to_string();
        assert_eq!(card.accent_rgb(), DEFAULT_ACCENT);

        card.theme_color = "#4A90E2".to_string();
        assert_eq!(card.accent_rgb(), (0x4A, 0x90, 0xE2));
    }

    #[test]
    fn test_serializes_in_camel_case() {
        let card = BookCard::from_value(sample()).unwrap();
        let value = serde_json::to_value(&card).unwrap();
        assert!(value.get("themeColor").is_some());
        assert!(value.get("detailedAnalysis").is_some());
    }
}
