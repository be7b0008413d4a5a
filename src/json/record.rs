use crate::reconcile::{Reconcilable, SoftDelete};
use serde_json::{Map, Value};

/// A JSON object taking part in a reconciliation.
///
/// With a soft delete field configured the record flags itself
/// (`"<field>": true`) when orphaned instead of being dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRecord {
    pub fields: Map<String, Value>,
    pub(crate) soft_delete_field: Option<String>,
}

impl JsonRecord {
    pub fn new(fields: Map<String, Value>, soft_delete_field: Option<String>) -> Self {
        Self {
            fields,
            soft_delete_field,
        }
    }

    /// Key value, unless missing or null.
    pub fn key<'a>(&'a self, key_field: &str) -> Option<&'a Value> {
        self.fields.get(key_field).filter(|value| !value.is_null())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl SoftDelete for JsonRecord {
    fn delete(&mut self) {
        if let Some(field) = &self.soft_delete_field {
            self.fields.insert(field.clone(), Value::Bool(true));
        }
    }

    fn is_deleted(&self) -> bool {
        self.soft_delete_field
            .as_ref()
            .and_then(|field| self.fields.get(field))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl Reconcilable for JsonRecord {
    fn as_soft_delete(&mut self) -> Option<&mut dyn SoftDelete> {
        match self.soft_delete_field {
            Some(_) => Some(self),
            None => None,
        }
    }
}
