use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record};

/// The dealership the operator acts for. Resolved once per screen by the
/// host from its session; `None` disables scoping for shared catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TenantContext {
    tenant_id: Option<i64>,
}

impl TenantContext {
    pub fn new(tenant_id: i64) -> Self {
        Self {
            tenant_id: Some(tenant_id),
        }
    }

    pub fn global() -> Self {
        Self { tenant_id: None }
    }

    pub fn tenant_id(&self) -> Option<i64> {
        self.tenant_id
    }

    pub fn is_global(&self) -> bool {
        self.tenant_id.is_none()
    }

    /// Tenant fields arrive as numbers or numeric strings depending on the
    /// endpoint, so the comparison goes through the numeric view.
    pub fn matches(&self, value: &FieldValue) -> bool {
        match self.tenant_id {
            None => true,
            Some(id) => value.as_number() == Some(id as f64),
        }
    }
}

pub fn scope_to_tenant(
    records: Vec<Record>,
    tenant_field: &str,
    tenant: TenantContext,
) -> Vec<Record> {
    if tenant.is_global() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| tenant.matches(record.get(tenant_field)))
        .collect()
}

/// Writes the tenant id into an outgoing record. No-op for global context.
pub fn stamp_tenant(record: &mut Record, tenant_field: &str, tenant: TenantContext) {
    if let Some(id) = tenant.tenant_id {
        record.set(tenant_field, id);
    }
}
