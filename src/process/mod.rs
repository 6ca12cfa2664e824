use crate::fetch::RawRecord;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Source column names in the upstream table.
pub const FIELD_NAME: &str = "이름";
pub const FIELD_CONDITION: &str = "투자 조건";
pub const FIELD_AMOUNT: &str = "기준금액";

/// Defaults substituted when a field is absent or null.
pub const DEFAULT_NAME: &str = "없음";
pub const DEFAULT_CONDITION: &str = "미정";

/// Fixed-shape row distilled from one raw record.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub name: String,
    pub condition: String,
    pub amount: f64,
}

/// Map every record to a row, one-to-one and order-preserved. Pure; missing
/// fields get defaults, nothing else is validated.
pub fn normalize_records(records: &[RawRecord]) -> Vec<NormalizedRow> {
    records.iter().map(normalize_record).collect()
}

fn normalize_record(record: &RawRecord) -> NormalizedRow {
    NormalizedRow {
        name: text_field(record, FIELD_NAME, DEFAULT_NAME),
        condition: text_field(record, FIELD_CONDITION, DEFAULT_CONDITION),
        amount: amount_field(record),
    }
}

fn text_field(record: &RawRecord, field: &str, default: &str) -> String {
    match record.fields.get(field) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        // non-string values keep their JSON display form
        Some(other) => other.to_string(),
    }
}

/// Amounts are coerced: JSON numbers pass through, numeric strings parse with
/// a warning, everything else falls back to the 0 default with a warning.
fn amount_field(record: &RawRecord) -> f64 {
    match record.fields.get(FIELD_AMOUNT) {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(v) => {
                warn!(id = %record.id, value = %s, "amount arrived as a string, coerced");
                v
            }
            Err(_) => {
                warn!(id = %record.id, value = %s, "non-numeric amount, using 0");
                0.0
            }
        },
        Some(other) => {
            warn!(id = %record.id, value = %other, "non-numeric amount, using 0");
            0.0
        }
    }
}

/// Distinct condition values in first-appearance order. This is the option
/// list the filter menu offers.
pub fn condition_options(rows: &[NormalizedRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut options = Vec::new();
    for row in rows {
        if seen.insert(row.condition.as_str()) {
            options.push(row.condition.clone());
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, fields: Value) -> RawRecord {
        serde_json::from_value(json!({ "id": id, "fields": fields })).unwrap()
    }

    #[test]
    fn one_row_per_record_in_order() {
        let records = vec![
            record("r1", json!({ "이름": "A", "투자 조건": "Seed", "기준금액": 100 })),
            record("r2", json!({ "이름": "B", "투자 조건": "Series A", "기준금액": 200 })),
            record("r3", json!({})),
        ];
        let rows = normalize_records(&records);
        assert_eq!(rows.len(), records.len());
        assert_eq!(rows[0].name, "A");
        assert_eq!(rows[1].name, "B");
        assert_eq!(rows[2].name, DEFAULT_NAME);
    }

    #[test]
    fn missing_fields_get_the_documented_defaults() {
        let rows = normalize_records(&[record("r1", json!({}))]);
        assert_eq!(
            rows[0],
            NormalizedRow {
                name: DEFAULT_NAME.to_string(),
                condition: DEFAULT_CONDITION.to_string(),
                amount: 0.0,
            }
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let rows = normalize_records(&[record(
            "r1",
            json!({ "이름": null, "투자 조건": null, "기준금액": null }),
        )]);
        assert_eq!(rows[0].name, DEFAULT_NAME);
        assert_eq!(rows[0].condition, DEFAULT_CONDITION);
        assert_eq!(rows[0].amount, 0.0);
    }

    #[test]
    fn numeric_string_amount_is_coerced() {
        let rows = normalize_records(&[record("r1", json!({ "기준금액": "250.5" }))]);
        assert_eq!(rows[0].amount, 250.5);
    }

    #[test]
    fn garbage_amount_falls_back_to_zero() {
        let rows = normalize_records(&[record("r1", json!({ "기준금액": "많이" }))]);
        assert_eq!(rows[0].amount, 0.0);
        let rows = normalize_records(&[record("r2", json!({ "기준금액": true }))]);
        assert_eq!(rows[0].amount, 0.0);
    }

    #[test]
    fn options_are_distinct_and_in_first_appearance_order() {
        let records = vec![
            record("r1", json!({ "투자 조건": "Series A" })),
            record("r2", json!({ "투자 조건": "Seed" })),
            record("r3", json!({ "투자 조건": "Series A" })),
            record("r4", json!({})),
        ];
        let rows = normalize_records(&records);
        assert_eq!(
            condition_options(&rows),
            vec!["Series A", "Seed", DEFAULT_CONDITION]
        );
    }
}
