use super::error::{JsonError, JsonResult};
use super::record::JsonRecord;
use crate::reconcile::{ReconcileOutcome, reconcile};
use serde_json::{Map, Value};
use std::convert::Infallible;

/// How records are paired and removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOptions {
    /// Field holding each record's key. Missing or null keys mean "new".
    ///
    /// Numeric keys compare by value, so `1` and `1.0` are the same key.
    /// Other JSON values must be equal as written.
    pub key_field: String,

    /// Flag set on orphaned targets instead of removing them.
    pub soft_delete_field: Option<String>,
}

impl RecordOptions {
    pub fn new(key_field: &str) -> Self {
        Self {
            key_field: key_field.to_string(),
            soft_delete_field: None,
        }
    }

    /// Set the soft delete flag field
    pub fn soft_delete_field(mut self, field: &str) -> Self {
        self.soft_delete_field = Some(field.to_string());
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> JsonResult<()> {
        if self.key_field.is_empty() {
            return Err(JsonError::EmptyKeyField);
        }
        Ok(())
    }
}

fn keys_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => l == r,
            _ => match (l.as_u64(), r.as_u64()) {
                (Some(l), Some(r)) => l == r,
                _ => l.as_f64() == r.as_f64(),
            },
        },
        _ => left == right,
    }
}

/// Facade for reconciling JSON record arrays.
///
/// # Examples
///
/// ```
/// use equivalency::json::{JsonRecordAdapter, RecordOptions};
///
/// let adapter = JsonRecordAdapter::new(RecordOptions::new("id")).unwrap();
/// let (records, outcome) = adapter
///     .reconcile_str(r#"[{"id": 1, "name": "new"}]"#, r#"[{"id": 1, "name": "old"}]"#)
///     .unwrap();
///
/// assert_eq!(outcome.updated, 1);
/// assert_eq!(records[0]["name"], "new");
/// ```
#[derive(Debug, Clone)]
pub struct JsonRecordAdapter {
    options: RecordOptions,
}

impl JsonRecordAdapter {
    pub fn new(options: RecordOptions) -> JsonResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &RecordOptions {
        &self.options
    }

    /// Parse a JSON array of objects.
    pub fn parse_records(&self, json: &str) -> JsonResult<Vec<Map<String, Value>>> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Array(items) = value else {
            return Err(JsonError::NotAnArray);
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(map),
                _ => Err(JsonError::NotAnObject(index)),
            })
            .collect()
    }

    /// Reconcile `target` records against `source` records.
    ///
    /// Matched targets receive every source field except the key. New
    /// records are copied whole, key included.
    pub fn reconcile_records(
        &self,
        source: &[Map<String, Value>],
        target: Vec<Map<String, Value>>,
    ) -> (Vec<Value>, ReconcileOutcome) {
        let key_field = self.options.key_field.as_str();
        let soft_delete_field = self.options.soft_delete_field.clone();

        let mut records: Vec<JsonRecord> = target
            .into_iter()
            .map(|fields| JsonRecord::new(fields, soft_delete_field.clone()))
            .collect();

        let equivalence = |item: &Map<String, Value>, record: &JsonRecord| {
            match (item.get(key_field).filter(|v| !v.is_null()), record.key(key_field)) {
                (Some(source_key), Some(target_key)) => keys_equal(source_key, target_key),
                _ => false,
            }
        };

        let copy = |item: &Map<String, Value>, record: &mut JsonRecord| -> Result<(), Infallible> {
            let is_new = record.fields.is_empty();
            for (name, value) in item {
                if name == key_field && !is_new {
                    continue;
                }
                record.fields.insert(name.clone(), value.clone());
            }
            record.soft_delete_field = soft_delete_field.clone();
            Ok(())
        };

        let outcome = match reconcile(source, &mut records, equivalence, copy) {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        };

        let values = records.into_iter().map(JsonRecord::into_value).collect();
        (values, outcome)
    }

    /// Parse both documents and reconcile them.
    pub fn reconcile_str(
        &self,
        source_json: &str,
        target_json: &str,
    ) -> JsonResult<(Vec<Value>, ReconcileOutcome)> {
        let source = self.parse_records(source_json)?;
        let target = self.parse_records(target_json)?;
        Ok(self.reconcile_records(&source, target))
    }
}
