//! Field lookup for webhook payloads whose key names drifted over time.
//!
//! Every concept is read through an ordered list of candidate keys: the
//! camelCase name is canonical and the snake_case or alternate names are
//! accepted as legacy spellings. All lookups live here so the dashboard code
//! never branches on payload shape itself.

use crate::models::Amount;
use serde_json::{Map, Value};

pub const PLACEHOLDER_SUMMARY: &str = "Your AI-generated executive summary will appear here. \
This will include key insights about spending patterns, top vendors, and notable trends \
across all uploaded financial documents.";

pub const UNKNOWN_VENDOR: &str = "Unknown";
pub const OTHER_CATEGORY: &str = "Other";

/// Candidate keys for free-text summaries, highest priority first.
pub const SUMMARY_TEXT_KEYS: &[&str] = &["summary", "human_summary", "textSummary"];

pub const VENDOR_TOTALS_KEYS: &[&str] = &["vendorTotals", "vendor_totals"];
pub const DATE_TRENDS_KEYS: &[&str] = &["dateTrends", "date_trends"];
pub const CATEGORY_BREAKDOWN_KEYS: &[&str] = &["categoryBreakdown", "category_breakdown"];

pub const TOTAL_DOCUMENTS_KEYS: &[&str] = &["totalDocuments", "total_documents"];
pub const TOTAL_SPENDING_KEYS: &[&str] = &["totalSpending", "total_spending"];
pub const TOTAL_TAX_KEYS: &[&str] = &["totalTax", "total_tax"];
pub const UNIQUE_VENDORS_KEYS: &[&str] = &["uniqueVendors", "unique_vendors"];

pub const VENDOR_LABEL_KEYS: &[&str] = &["vendor", "name"];
pub const VENDOR_VALUE_KEYS: &[&str] = &["total", "amount", "value"];
pub const DATE_LABEL_KEYS: &[&str] = &["date", "day"];
pub const CATEGORY_LABEL_KEYS: &[&str] = &["category", "name"];
pub const AMOUNT_KEYS: &[&str] = &["amount", "value", "total"];

/// First present, non-null value among `keys`.
pub fn first<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// First key holding a non-blank string.
pub fn first_text<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
}

/// First key holding a number, or a string that parses as one.
pub fn first_number(object: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(as_number)
}

/// First key holding a number or a non-blank string. Numeric strings become
/// numbers; anything else is kept as text.
pub fn first_amount(object: &Map<String, Value>, keys: &[&str]) -> Option<Amount> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(as_amount)
}

/// First key holding an array.
pub fn first_array<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_array))
        .next()
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_amount(value: &Value) -> Option<Amount> {
    if let Some(number) = as_number(value) {
        return Some(Amount::Number(number));
    }
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(Amount::Text(text.clone())),
        _ => None,
    }
}

/// Label for a series tuple; numeric labels (e.g. years) are rendered as text.
pub fn label(value: &Value, keys: &[&str], default: &str) -> String {
    let Some(object) = value.as_object() else {
        return default.to_string();
    };
    match first(object, keys) {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => default.to_string(),
    }
}

pub fn amount(value: &Value, keys: &[&str]) -> f64 {
    value
        .as_object()
        .and_then(|object| first_number(object, keys))
        .unwrap_or(0.0)
}

/// Text for the executive summary panel.
///
/// Checks a bare string payload, then the summary keys at the top level,
/// then the same keys nested under `summary`. Payloads with none of them are
/// shown as pretty-printed JSON; an empty cache or empty payload shows the
/// placeholder.
pub fn display_text(result: Option<&Value>) -> String {
    let Some(result) = result else {
        return PLACEHOLDER_SUMMARY.to_string();
    };

    match result {
        Value::Null => PLACEHOLDER_SUMMARY.to_string(),
        Value::String(text) if text.trim().is_empty() => PLACEHOLDER_SUMMARY.to_string(),
        Value::String(text) => text.clone(),
        Value::Object(object) if object.is_empty() => PLACEHOLDER_SUMMARY.to_string(),
        Value::Object(object) => {
            if let Some(text) = first_text(object, SUMMARY_TEXT_KEYS) {
                return text.to_string();
            }
            let nested = object
                .get("summary")
                .and_then(Value::as_object)
                .and_then(|inner| first_text(inner, SUMMARY_TEXT_KEYS));
            match nested {
                Some(text) => text.to_string(),
                None => pretty(result),
            }
        }
        other => pretty(other),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_priority() {
        let both = json!({ "summary": "A", "human_summary": "B" });
        assert_eq!(display_text(Some(&both)), "A");

        let human = json!({ "human_summary": "B" });
        assert_eq!(display_text(Some(&human)), "B");

        let text = json!({ "human_summary": "B", "textSummary": "C" });
        assert_eq!(display_text(Some(&text)), "B");

        assert_eq!(display_text(Some(&json!({}))), PLACEHOLDER_SUMMARY);
        assert_eq!(display_text(None), PLACEHOLDER_SUMMARY);
    }

    #[test]
    fn plain_string_payload_wins() {
        assert_eq!(display_text(Some(&json!("Spending rose 4%."))), "Spending rose 4%.");
    }

    #[test]
    fn nested_summary_object() {
        let nested = json!({ "summary": { "textSummary": "nested text" }, "totalTax": 4 });
        assert_eq!(display_text(Some(&nested)), "nested text");

        let nested_human = json!({ "summary": { "human_summary": "H", "textSummary": "T" } });
        assert_eq!(display_text(Some(&nested_human)), "H");
    }

    #[test]
    fn unknown_shape_is_dumped() {
        let payload = json!({ "status": "queued" });
        let text = display_text(Some(&payload));
        assert!(text.contains("\"status\": \"queued\""));
    }

    #[test]
    fn blank_summary_falls_through() {
        let payload = json!({ "summary": "  ", "textSummary": "real" });
        assert_eq!(display_text(Some(&payload)), "real");
    }

    #[test]
    fn tuple_fallbacks() {
        let alternate = json!({ "name": "Acme", "amount": 10 });
        assert_eq!(label(&alternate, VENDOR_LABEL_KEYS, UNKNOWN_VENDOR), "Acme");
        assert_eq!(amount(&alternate, VENDOR_VALUE_KEYS), 10.0);

        let empty = json!({});
        assert_eq!(label(&empty, VENDOR_LABEL_KEYS, UNKNOWN_VENDOR), UNKNOWN_VENDOR);
        assert_eq!(label(&empty, CATEGORY_LABEL_KEYS, OTHER_CATEGORY), OTHER_CATEGORY);
        assert_eq!(amount(&empty, AMOUNT_KEYS), 0.0);

        let stringly = json!({ "category": "Travel", "value": "12.50" });
        assert_eq!(amount(&stringly, AMOUNT_KEYS), 12.5);
    }

    #[test]
    fn formatted_amount_is_kept_as_text() {
        let formatted = json!({ "totalSpending": "$1,234", "total_spending": 99 });
        assert_eq!(
            first_amount(formatted.as_object().unwrap(), TOTAL_SPENDING_KEYS),
            Some(Amount::Text("$1,234".into()))
        );

        let numeric = json!({ "totalTax": " 12.5 " });
        assert_eq!(
            first_amount(numeric.as_object().unwrap(), TOTAL_TAX_KEYS),
            Some(Amount::Number(12.5))
        );

        let blank = json!({ "totalTax": "  ", "total_tax": 3 });
        assert_eq!(
            first_amount(blank.as_object().unwrap(), TOTAL_TAX_KEYS),
            Some(Amount::Number(3.0))
        );
        assert_eq!(first_amount(&Map::new(), TOTAL_TAX_KEYS), None);
    }
}
