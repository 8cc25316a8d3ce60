use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::ConsoleError;
use crate::record::{FieldValue, Record};

/// A filterable field and the label of its selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    pub field: String,
    pub label: String,
}

impl FilterField {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    pub value: FieldValue,
    pub label: String,
}

/// Option set for one declared field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOptions {
    pub field: String,
    pub label: String,
    pub options: Vec<FilterOption>,
}

impl FieldOptions {
    pub fn contains(&self, value: &FieldValue) -> bool {
        self.options.iter().any(|option| &option.value == value)
    }
}

/// Distinct non-empty values per declared field, sorted by display text.
///
/// Options always come from the whole snapshot, never from the current
/// projection, so one active filter cannot hide the choices of another.
pub fn derive_options(records: &[Record], declaration: &[FilterField]) -> Vec<FieldOptions> {
    declaration
        .iter()
        .map(|decl| {
            let mut seen = HashSet::new();
            let mut values: Vec<FieldValue> = Vec::new();
            for record in records {
                let value = record.get(&decl.field);
                if value.is_empty() {
                    continue;
                }
                if seen.insert((value.kind_tag(), value.display())) {
                    values.push(value.clone());
                }
            }
            values.sort_by_cached_key(|value| value.display());

            FieldOptions {
                field: decl.field.clone(),
                label: decl.label.clone(),
                options: values
                    .into_iter()
                    .map(|value| FilterOption {
                        label: value.display(),
                        value,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Currently selected value per field. A field is either constrained to a
/// value from its option set or absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    selections: BTreeMap<String, FieldValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `value` for `field`. An empty value clears the field.
    pub fn select(
        &mut self,
        field: &str,
        value: FieldValue,
        options: &[FieldOptions],
    ) -> Result<(), ConsoleError> {
        if value.is_empty() {
            self.clear(field);
            return Ok(());
        }

        let valid = options
            .iter()
            .find(|opts| opts.field == field)
            .is_some_and(|opts| opts.contains(&value));
        if !valid {
            return Err(ConsoleError::InvalidFilter {
                field: field.to_string(),
                value: value.display(),
            });
        }

        self.selections.insert(field.to_string(), value);
        Ok(())
    }

    pub fn clear(&mut self, field: &str) {
        self.selections.remove(field);
    }

    pub fn reset(&mut self) {
        self.selections.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.selections.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.selections.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.selections.iter()
    }

    /// Drops selections that are no longer offered. Returns the dropped
    /// field names.
    pub fn retain_valid(&mut self, options: &[FieldOptions]) -> Vec<String> {
        let mut dropped = Vec::new();
        self.selections.retain(|field, value| {
            let keep = options
                .iter()
                .find(|opts| &opts.field == field)
                .is_some_and(|opts| opts.contains(value));
            if !keep {
                dropped.push(field.clone());
            }
            keep
        });
        dropped
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.selections
            .iter()
            .all(|(field, value)| record.get(field) == value)
    }
}

/// Conjunctive equality filter over the snapshot, preserving order.
pub fn apply_filters(records: &[Record], state: &FilterState) -> Vec<Record> {
    records
        .iter()
        .filter(|record| state.matches(record))
        .cloned()
        .collect()
}
