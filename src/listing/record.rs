use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names tried, in order, to label a listing for humans
const LABEL_FIELDS: [&str; 4] = ["address", "title", "name", "id"];

/// One listing row: field name to value, in column order.
///
/// Values read from CSV are strings, or `null` for cells missing from a
/// short row. Scores written back by the engine are numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingRecord {
    fields: Map<String, Value>,
}

impl ListingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Insert or overwrite a field. Overwriting keeps the field's position.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// Field names in insertion order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Cell text for tabular output: strings verbatim, `null` empty,
    /// anything else in its JSON form.
    pub fn cell(&self, field: &str) -> String {
        match self.fields.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Human label: first non-empty of address/title/name/id.
    pub fn label(&self) -> Option<&str> {
        LABEL_FIELDS.iter().find_map(|field| match self.fields.get(*field) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        })
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ListingRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overwrite_keeps_position() {
        let mut record: ListingRecord = [
            ("id", json!("L1")),
            ("commute_score", json!("40")),
            ("aod", json!("0.1")),
        ]
        .into_iter()
        .collect();

        record.set("commute_score", json!(55.5));
        record.set("maplify_score", json!(70));

        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, ["id", "commute_score", "aod", "maplify_score"]);
        assert_eq!(record.get("commute_score"), Some(&json!(55.5)));
    }

    #[test]
    fn test_cell_rendering() {
        let record: ListingRecord = [
            ("address", json!("12 Elm St")),
            ("ndvi", Value::Null),
            ("green_score", json!(100.0)),
            ("maplify_score", json!(83)),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.cell("address"), "12 Elm St");
        assert_eq!(record.cell("ndvi"), "");
        assert_eq!(record.cell("missing"), "");
        assert_eq!(record.cell("green_score"), "100.0");
        assert_eq!(record.cell("maplify_score"), "83");
    }

    #[test]
    fn test_label_prefers_address() {
        let record: ListingRecord = [("id", json!("L7")), ("address", json!("4 Oak Rd"))]
            .into_iter()
            .collect();
        assert_eq!(record.label(), Some("4 Oak Rd"));
    }

    #[test]
    fn test_label_skips_blank_fields() {
        let record: ListingRecord = [("address", json!("  ")), ("id", json!("L7"))]
            .into_iter()
            .collect();
        assert_eq!(record.label(), Some("L7"));

        let unlabeled: ListingRecord = [("aod", json!("0.2"))].into_iter().collect();
        assert_eq!(unlabeled.label(), None);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let record: ListingRecord = [("id", json!("L1")), ("maplify_score", json!(64))]
            .into_iter()
            .collect();
        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"id":"L1","maplify_score":64}"#);
    }
}
