use crate::models::{DashboardView, Metrics, SeriesPoint};
use crate::normalize::{
    self, AMOUNT_KEYS, CATEGORY_BREAKDOWN_KEYS, CATEGORY_LABEL_KEYS, DATE_LABEL_KEYS,
    DATE_TRENDS_KEYS, OTHER_CATEGORY, TOTAL_DOCUMENTS_KEYS, TOTAL_SPENDING_KEYS, TOTAL_TAX_KEYS,
    UNIQUE_VENDORS_KEYS, UNKNOWN_VENDOR, VENDOR_LABEL_KEYS, VENDOR_TOTALS_KEYS, VENDOR_VALUE_KEYS,
};
use serde_json::{Map, Value};

/// Shapes a cached analysis result into chart series and headline numbers.
/// Values and ordering are passed through exactly as the webhook sent them.
pub fn build_dashboard(result: Option<&Value>) -> DashboardView {
    let object = result.and_then(Value::as_object);

    DashboardView {
        has_result: result.is_some(),
        summary_text: normalize::display_text(result),
        metrics: object.map(metrics).unwrap_or_default(),
        vendor_totals: object.and_then(|o| {
            series(o, VENDOR_TOTALS_KEYS, VENDOR_LABEL_KEYS, UNKNOWN_VENDOR, VENDOR_VALUE_KEYS)
        }),
        date_trends: object.and_then(|o| series(o, DATE_TRENDS_KEYS, DATE_LABEL_KEYS, "", AMOUNT_KEYS)),
        category_breakdown: object.and_then(|o| {
            series(o, CATEGORY_BREAKDOWN_KEYS, CATEGORY_LABEL_KEYS, OTHER_CATEGORY, AMOUNT_KEYS)
        }),
    }
}

fn metrics(object: &Map<String, Value>) -> Metrics {
    let figure = |keys: &[&str]| normalize::first_amount(object, keys).unwrap_or_default();
    Metrics {
        total_documents: figure(TOTAL_DOCUMENTS_KEYS),
        total_spending: figure(TOTAL_SPENDING_KEYS),
        total_tax: figure(TOTAL_TAX_KEYS),
        unique_vendors: figure(UNIQUE_VENDORS_KEYS),
    }
}

fn series(
    object: &Map<String, Value>,
    field_keys: &[&str],
    label_keys: &[&str],
    default_label: &str,
    value_keys: &[&str],
) -> Option<Vec<SeriesPoint>> {
    let items = normalize::first_array(object, field_keys)?;
    Some(
        items
            .iter()
            .map(|item| SeriesPoint {
                label: normalize::label(item, label_keys, default_label),
                value: normalize::amount(item, value_keys),
            })
            .collect(),
    )
}
