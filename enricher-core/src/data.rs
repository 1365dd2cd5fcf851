use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One parsed CSV row: column name to cell value, in file column order.
pub type Record = IndexMap<String, Scalar>;

/// A single typed CSV cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Value stored under one key of the output mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    TextList(Vec<String>),
    Records(Vec<Record>),
}

impl FieldValue {
    pub fn empty_text() -> Self {
        FieldValue::Text(String::new())
    }

    pub fn empty_list() -> Self {
        FieldValue::TextList(Vec::new())
    }

    /// True for `""` and for an empty list of either kind.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::TextList(v) => v.is_empty(),
            FieldValue::Records(v) => v.is_empty(),
        }
    }

    pub fn is_list(&self) -> bool {
        !matches!(self, FieldValue::Text(_))
    }
}

/// The caller-owned mapping that enrichment steps write into.
///
/// Steps only ever add or overwrite keys; nothing is removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExternalData {
    fields: BTreeMap<String, FieldValue>,
}

impl ExternalData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn text_list(&self, key: &str) -> Option<&[String]> {
        match self.fields.get(key) {
            Some(FieldValue::TextList(v)) => Some(v),
            _ => None,
        }
    }

    pub fn records(&self, key: &str) -> Option<&[Record]> {
        match self.fields.get(key) {
            Some(FieldValue::Records(v)) => Some(v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let mut data = ExternalData::new();
        data.insert("URL Content", FieldValue::Text("hello".to_string()));
        data.insert("Sub Pages", FieldValue::TextList(vec!["http://a/".to_string()]));

        assert_eq!(data.text("URL Content"), Some("hello"));
        assert_eq!(data.text_list("URL Content"), None);
        assert_eq!(data.text_list("Sub Pages").map(|v| v.len()), Some(1));
        assert!(data.records("Sub Pages").is_none());
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut data = ExternalData::new();
        data.insert("k", FieldValue::empty_list());
        let previous = data.insert("k", FieldValue::empty_text());

        assert_eq!(previous, Some(FieldValue::empty_list()));
        assert_eq!(data.get("k"), Some(&FieldValue::empty_text()));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_json_object() {
        let mut record = Record::new();
        record.insert("name".to_string(), Scalar::from("Ada"));
        record.insert("age".to_string(), Scalar::from(36_i64));
        record.insert("score".to_string(), Scalar::from(9.5_f64));
        record.insert("active".to_string(), Scalar::from(true));
        record.insert("notes".to_string(), Scalar::Null);

        let mut data = ExternalData::new();
        data.insert("CSV Data", FieldValue::Records(vec![record]));
        data.insert("URL Content", FieldValue::empty_text());

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "CSV Data": [{"active": true, "age": 36, "name": "Ada", "notes": null, "score": 9.5}],
                "URL Content": ""
            })
        );
    }

    #[test]
    fn test_record_columns_keep_insertion_order() {
        let mut record = Record::new();
        record.insert("zeta".to_string(), Scalar::from(1_i64));
        record.insert("alpha".to_string(), Scalar::from(2_i64));

        let mut data = ExternalData::new();
        data.insert("CSV Data", FieldValue::Records(vec![record]));

        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"CSV Data":[{"zeta":1,"alpha":2}]}"#);
    }

    #[test]
    fn test_empty_values() {
        assert!(FieldValue::empty_text().is_empty());
        assert!(FieldValue::empty_list().is_empty());
        assert!(FieldValue::Records(Vec::new()).is_list());
        assert!(!FieldValue::empty_text().is_list());
    }
}
