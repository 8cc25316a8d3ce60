use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record};

/// Collapses two remote spellings of one attribute onto a canonical field,
/// e.g. `image` / `imageUrl` onto `image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAlias {
    pub canonical: String,
    pub primary: String,
    pub fallback: String,
}

impl FieldAlias {
    pub fn new(
        canonical: impl Into<String>,
        primary: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            canonical: canonical.into(),
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }
}

/// Primary wins over fallback; an empty text value when neither is set.
pub fn coalesce_field(record: &Record, alias: &FieldAlias) -> FieldValue {
    [&alias.primary, &alias.fallback]
        .into_iter()
        .map(|field| record.get(field))
        .find(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| FieldValue::Text(String::new()))
}

pub fn normalize_record(mut record: Record, aliases: &[FieldAlias]) -> Record {
    for alias in aliases {
        let value = coalesce_field(&record, alias);
        record.set(alias.canonical.clone(), value);
    }
    record
}
