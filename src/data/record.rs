// Record type for named-field rows
// Author: Gabriel Demetrios Lafis

use super::Value;

/// Represents a row as an ordered mapping from field name to value
///
/// Field order is the insertion order. A record may carry fields that are
/// not declared on its owning frame; serialization only exposes declared
/// columns. Equality compares the field set as a mapping; field order
/// does not matter.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Record) -> bool {
        fn covers(left: &Record, right: &Record) -> bool {
            right.fields.iter().all(|(name, value)| {
                left.get(name).map_or(false, |candidate| candidate == value)
            })
        }

        self.fields.len() == other.fields.len() && covers(self, other) && covers(other, self)
    }
}

impl Record {
    /// Create a new empty record
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Create a record from a list of named fields
    pub fn from_fields(fields: Vec<(String, Value)>) -> Self {
        Record { fields }
    }

    /// Add a field to the record, replacing any field of the same name
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Get a reference to a field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Check whether the record carries a field with the given name
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }

    /// Set a field value, replacing an existing field or appending a new one
    pub fn set(&mut self, name: &str, value: Value) {
        for (field, slot) in &mut self.fields {
            if field == name {
                *slot = value;
                return;
            }
        }

        self.fields.push((name.to_string(), value));
    }

    /// Remove a field by name and return its value
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let position = self.fields.iter().position(|(field, _)| field == name)?;
        Some(self.fields.remove(position).1)
    }

    /// Get the field names in order
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Iterate over the named fields in order
    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.fields.iter()
    }

    /// Get the number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Project the record onto the given columns, in column order
    ///
    /// Fields missing from the record (or carrying the absent sentinel)
    /// are left out of the projection.
    pub fn project(&self, columns: &[String]) -> Record {
        let mut fields = Vec::new();

        for column in columns {
            if let Some(value) = self.get(column) {
                if !value.is_absent() {
                    fields.push((column.clone(), value.clone()));
                }
            }
        }

        Record { fields }
    }
}
