use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;
use crate::record::{FieldValue, Record};

pub const NOT_FOUND: &str = "Not found";

fn default_customer_key() -> String {
    "customerId".to_string()
}

fn default_order_key() -> String {
    "orderId".to_string()
}

fn default_identity() -> String {
    "id".to_string()
}

fn default_customer_fields() -> Vec<String> {
    vec!["name".to_string(), "phone".to_string(), "email".to_string()]
}

fn default_order_label_field() -> String {
    "name".to_string()
}

fn default_separator() -> String {
    " | ".to_string()
}

fn default_not_found() -> String {
    NOT_FOUND.to_string()
}

/// Field names used to stitch feedback to customers and orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinConfig {
    /// Foreign key on feedback and order records.
    #[serde(default = "default_customer_key")]
    pub customer_key: String,
    /// Foreign key on feedback records.
    #[serde(default = "default_order_key")]
    pub order_key: String,
    #[serde(default = "default_identity")]
    pub customer_identity: String,
    #[serde(default = "default_identity")]
    pub order_identity: String,
    #[serde(default = "default_customer_fields")]
    pub customer_fields: Vec<String>,
    #[serde(default = "default_order_label_field")]
    pub order_label_field: String,
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_not_found")]
    pub not_found: String,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            customer_key: default_customer_key(),
            order_key: default_order_key(),
            customer_identity: default_identity(),
            order_identity: default_identity(),
            customer_fields: default_customer_fields(),
            order_label_field: default_order_label_field(),
            separator: default_separator(),
            not_found: default_not_found(),
        }
    }
}

/// A feedback record with its foreign keys resolved to display text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRow {
    pub record: Record,
    pub customer: String,
    pub order: String,
}

pub fn find_by_identity<'a>(
    records: &'a [Record],
    identity_field: &str,
    key: &FieldValue,
) -> Option<&'a Record> {
    records
        .iter()
        .find(|record| record.get(identity_field).loosely_equals(key))
}

/// `name | phone | email` of the referenced customer, or the sentinel.
pub fn customer_summary(customers: &[Record], key: &FieldValue, config: &JoinConfig) -> String {
    match find_by_identity(customers, &config.customer_identity, key) {
        Some(customer) => config
            .customer_fields
            .iter()
            .map(|field| customer.get(field).display())
            .collect::<Vec<_>>()
            .join(&config.separator),
        None => config.not_found.clone(),
    }
}

pub fn order_summary(orders: &[Record], key: &FieldValue, config: &JoinConfig) -> String {
    match find_by_identity(orders, &config.order_identity, key) {
        Some(order) => {
            let label = order.get(&config.order_label_field);
            if label.is_empty() {
                order.get(&config.order_identity).display()
            } else {
                label.display()
            }
        }
        None => config.not_found.clone(),
    }
}

pub fn join_feedback(
    feedback: &[Record],
    customers: &[Record],
    orders: &[Record],
    config: &JoinConfig,
) -> Vec<FeedbackRow> {
    feedback
        .iter()
        .map(|record| FeedbackRow {
            customer: customer_summary(customers, record.get(&config.customer_key), config),
            order: order_summary(orders, record.get(&config.order_key), config),
            record: record.clone(),
        })
        .collect()
}

/// Orders belonging to `customer`; empty when no customer is chosen.
pub fn orders_for_customer<'a>(
    orders: &'a [Record],
    customer: &FieldValue,
    config: &JoinConfig,
) -> Vec<&'a Record> {
    if customer.is_empty() {
        return Vec::new();
    }
    orders
        .iter()
        .filter(|order| order.get(&config.customer_key).loosely_equals(customer))
        .collect()
}

/// Customer → order pair of a form where the order choices depend on the
/// customer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadingSelection {
    customer: FieldValue,
    order: FieldValue,
}

impl CascadingSelection {
    pub fn new(customer: FieldValue, order: FieldValue) -> Self {
        Self { customer, order }
    }

    pub fn customer(&self) -> &FieldValue {
        &self.customer
    }

    pub fn order(&self) -> &FieldValue {
        &self.order
    }

    pub fn order_enabled(&self) -> bool {
        !self.customer.is_empty()
    }

    pub fn candidates<'a>(&self, orders: &'a [Record], config: &JoinConfig) -> Vec<&'a Record> {
        orders_for_customer(orders, &self.customer, config)
    }

    /// Changes the customer and clears an order that does not belong to it.
    /// Returns whether the order selection was cleared.
    pub fn select_customer(
        &mut self,
        customer: FieldValue,
        orders: &[Record],
        config: &JoinConfig,
    ) -> bool {
        self.customer = customer;
        if self.order.is_empty() {
            return false;
        }
        let still_valid = self
            .candidates(orders, config)
            .iter()
            .any(|order| order.get(&config.order_identity).loosely_equals(&self.order));
        if !still_valid {
            self.order = FieldValue::Absent;
        }
        !still_valid
    }

    pub fn select_order(
        &mut self,
        order: FieldValue,
        orders: &[Record],
        config: &JoinConfig,
    ) -> Result<(), ConsoleError> {
        if order.is_empty() {
            self.order = FieldValue::Absent;
            return Ok(());
        }
        if !self.order_enabled() {
            return Err(ConsoleError::Validation(
                "choose a customer before choosing an order".to_string(),
            ));
        }
        let belongs = self
            .candidates(orders, config)
            .iter()
            .any(|candidate| candidate.get(&config.order_identity).loosely_equals(&order));
        if !belongs {
            return Err(ConsoleError::Validation(format!(
                "order {} does not belong to customer {}",
                order.display(),
                self.customer.display()
            )));
        }
        self.order = order;
        Ok(())
    }
}
