use tracing::debug;

use crate::client::ResourceClient;
use crate::config::{ConsoleConfig, FeedbackConfig};
use crate::error::{ConsoleError, Notice};
use crate::join::{join_feedback, CascadingSelection, FeedbackRow, JoinConfig};
use crate::record::{FieldValue, Record};
use crate::screen::ResourceScreen;
use crate::tenant::TenantContext;

/// Feedback screen: feedback rows joined against customers and orders, and a
/// form where the order choices follow the chosen customer.
///
/// The three collections load and fail independently. Joined rows are built
/// on demand from whatever snapshots are installed at that moment.
pub struct FeedbackScreen<F, C, O> {
    feedback: ResourceScreen<F>,
    customers: ResourceScreen<C>,
    orders: ResourceScreen<O>,
    join: JoinConfig,
}

impl<F, C, O> FeedbackScreen<F, C, O>
where
    F: ResourceClient,
    C: ResourceClient,
    O: ResourceClient,
{
    pub fn new(
        feedback: ResourceScreen<F>,
        customers: ResourceScreen<C>,
        orders: ResourceScreen<O>,
        join: JoinConfig,
    ) -> Self {
        Self {
            feedback,
            customers,
            orders,
            join,
        }
    }

    /// Builds the screen from the `feedback` section of a console config.
    pub fn from_config(
        config: &ConsoleConfig,
        tenant: TenantContext,
        feedback_client: F,
        customer_client: C,
        order_client: O,
    ) -> anyhow::Result<Self> {
        let FeedbackConfig {
            feedback,
            customers,
            orders,
            join,
        } = config
            .feedback
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("console configuration has no feedback section"))?;

        Ok(Self::new(
            ResourceScreen::new(config.screen(feedback)?.clone(), feedback_client, tenant),
            ResourceScreen::new(config.screen(customers)?.clone(), customer_client, tenant),
            ResourceScreen::new(config.screen(orders)?.clone(), order_client, tenant),
            join.clone(),
        ))
    }

    pub fn feedback(&self) -> &ResourceScreen<F> {
        &self.feedback
    }

    /// Filter and edit access to the feedback collection itself.
    pub fn feedback_mut(&mut self) -> &mut ResourceScreen<F> {
        &mut self.feedback
    }

    pub fn customers(&self) -> &[Record] {
        self.customers.snapshot().records()
    }

    pub fn orders(&self) -> &[Record] {
        self.orders.snapshot().records()
    }

    pub fn join_config(&self) -> &JoinConfig {
        &self.join
    }

    /// Fetches all three collections concurrently. Each successful fetch is
    /// installed; each failure keeps that collection's previous snapshot and
    /// posts a notice. Returns the first failure.
    pub async fn reload_all(&mut self) -> Result<(), ConsoleError> {
        let (feedback, customers, orders) = futures::join!(
            self.feedback.fetch_snapshot(),
            self.customers.fetch_snapshot(),
            self.orders.fetch_snapshot()
        );

        let results = [
            self.feedback.apply_fetch(feedback),
            self.customers.apply_fetch(customers),
            self.orders.apply_fetch(orders),
        ];
        results.into_iter().collect::<Result<Vec<()>, _>>().map(|_| ())
    }

    /// Filtered feedback with customer and order resolved for display.
    pub fn rows(&self) -> Vec<FeedbackRow> {
        join_feedback(
            self.feedback.projection(),
            self.customers(),
            self.orders(),
            &self.join,
        )
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut notices = self.feedback.drain_notices();
        notices.extend(self.customers.drain_notices());
        notices.extend(self.orders.drain_notices());
        notices
    }

    // --- Form ---

    pub fn open_create(&mut self) -> Result<(), ConsoleError> {
        self.feedback.open_create()
    }

    pub fn open_edit(&mut self, id: &FieldValue) -> Result<(), ConsoleError> {
        self.feedback.open_edit(id)
    }

    pub fn cancel_edit(&mut self) {
        self.feedback.cancel_edit();
    }

    pub fn set_draft_field(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ConsoleError> {
        let field_is_key = field == self.join.customer_key || field == self.join.order_key;
        if field_is_key {
            return Err(ConsoleError::Validation(format!(
                "{field} is set through the customer and order selectors"
            )));
        }
        self.feedback.set_draft_field(field, value)
    }

    /// Customer/order pair held by the open form.
    pub fn selection(&self) -> Option<CascadingSelection> {
        let pending = self.feedback.edit_state().pending()?;
        let draft = pending.draft();
        Some(CascadingSelection::new(
            draft.get(&self.join.customer_key).clone(),
            draft.get(&self.join.order_key).clone(),
        ))
    }

    pub fn order_select_enabled(&self) -> bool {
        self.selection()
            .is_some_and(|selection| selection.order_enabled())
    }

    /// Orders the order selector may offer; empty until a customer is chosen.
    pub fn candidate_orders(&self) -> Vec<&Record> {
        match self.selection() {
            Some(selection) => selection.candidates(self.orders(), &self.join),
            None => Vec::new(),
        }
    }

    /// Sets the customer and clears an order that belongs to someone else.
    /// Returns whether the order was cleared.
    pub fn select_customer(
        &mut self,
        customer: impl Into<FieldValue>,
    ) -> Result<bool, ConsoleError> {
        let mut selection = self.selection().ok_or(ConsoleError::NoPendingEdit)?;
        let cleared = selection.select_customer(customer.into(), self.orders(), &self.join);
        if cleared {
            debug!("customer changed, cleared order selection");
        }
        self.write_selection(selection)?;
        Ok(cleared)
    }

    pub fn select_order(&mut self, order: impl Into<FieldValue>) -> Result<(), ConsoleError> {
        let mut selection = self.selection().ok_or(ConsoleError::NoPendingEdit)?;
        selection.select_order(order.into(), self.orders(), &self.join)?;
        self.write_selection(selection)
    }

    fn write_selection(&mut self, selection: CascadingSelection) -> Result<(), ConsoleError> {
        let customer_key = self.join.customer_key.clone();
        let order_key = self.join.order_key.clone();
        self.feedback
            .set_draft_field(&customer_key, selection.customer().clone())?;
        self.feedback
            .set_draft_field(&order_key, selection.order().clone())
    }

    /// Checks that the order still belongs to the customer, then upserts
    /// through the feedback screen.
    pub async fn submit(&mut self) -> Result<Record, ConsoleError> {
        let selection = self.selection().ok_or(ConsoleError::NoPendingEdit)?;
        if !selection.order().is_empty() {
            let belongs = selection
                .candidates(self.orders(), &self.join)
                .iter()
                .any(|order| {
                    order
                        .get(&self.join.order_identity)
                        .loosely_equals(selection.order())
                });
            if !belongs {
                let err = ConsoleError::Validation(format!(
                    "order {} does not belong to customer {}",
                    selection.order().display(),
                    selection.customer().display()
                ));
                self.feedback.notify(Notice::error(err.to_string()));
                return Err(err);
            }
        }
        self.feedback.submit().await
    }
}
