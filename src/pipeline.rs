use chrono::{DateTime, Utc};

use crate::config::ScreenConfig;
use crate::normalize::{normalize_record, FieldAlias};
use crate::order::sort_by_order_key;
use crate::record::Record;
use crate::tenant::{scope_to_tenant, TenantContext};

/// Normalize, scope and order a freshly listed collection.
#[derive(Debug, Clone)]
pub struct Pipeline {
    aliases: Vec<FieldAlias>,
    tenant_field: String,
    tenant: TenantContext,
    order_field: Option<String>,
}

impl Pipeline {
    pub fn new(
        aliases: Vec<FieldAlias>,
        tenant_field: impl Into<String>,
        tenant: TenantContext,
        order_field: Option<String>,
    ) -> Self {
        Self {
            aliases,
            tenant_field: tenant_field.into(),
            tenant,
            order_field,
        }
    }

    /// Screens that are not tenant scoped see the whole collection.
    pub fn for_screen(config: &ScreenConfig, tenant: TenantContext) -> Self {
        let tenant = if config.tenant_scoped {
            tenant
        } else {
            TenantContext::global()
        };
        Self::new(
            config.aliases.clone(),
            config.tenant_field.clone(),
            tenant,
            config.order_field.clone(),
        )
    }

    pub fn tenant(&self) -> TenantContext {
        self.tenant
    }

    pub fn materialize(&self, raw: Vec<Record>) -> Snapshot {
        let normalized: Vec<Record> = raw
            .into_iter()
            .map(|record| normalize_record(record, &self.aliases))
            .collect();
        let mut records = scope_to_tenant(normalized, &self.tenant_field, self.tenant);
        if let Some(field) = &self.order_field {
            sort_by_order_key(&mut records, field);
        }
        Snapshot::new(records)
    }
}

/// Point-in-time copy of a collection. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    records: Vec<Record>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}
