//! Dashboard totals derived from the current collections.

use crate::model::client::Client;
use crate::model::invoice::{Invoice, InvoiceStatus};
use crate::repo::record_store::RecordStore;
use crate::storage::KeyValueStorage;

/// Aggregate counts and revenue shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardSummary {
    pub total_clients: usize,
    pub total_invoices: usize,
    /// Sum of all invoice amounts, paid or not.
    pub total_revenue: f64,
    pub paid_invoices: usize,
    pub unpaid_invoices: usize,
}

/// Computes dashboard totals from plain slices.
pub fn summarize(clients: &[Client], invoices: &[Invoice]) -> DashboardSummary {
    let paid_invoices = invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Paid)
        .count();
    let unpaid_invoices = invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Unpaid)
        .count();

    DashboardSummary {
        total_clients: clients.len(),
        total_invoices: invoices.len(),
        total_revenue: invoices.iter().map(|invoice| invoice.amount).sum(),
        paid_invoices,
        unpaid_invoices,
    }
}

/// Sum of amounts on unpaid invoices.
pub fn outstanding_amount(invoices: &[Invoice]) -> f64 {
    invoices
        .iter()
        .filter(|invoice| !invoice.is_paid())
        .map(|invoice| invoice.amount)
        .sum()
}

/// Dashboard use-case service borrowing a store.
pub struct DashboardService<'store, S: KeyValueStorage> {
    store: &'store RecordStore<S>,
}

impl<'store, S: KeyValueStorage> DashboardService<'store, S> {
    pub fn new(store: &'store RecordStore<S>) -> Self {
        Self { store }
    }

    /// Recomputes totals from the store's current collections.
    pub fn summary(&self) -> DashboardSummary {
        summarize(self.store.list_clients(), self.store.list_invoices())
    }

    /// Amount still owed across unpaid invoices.
    pub fn outstanding_amount(&self) -> f64 {
        outstanding_amount(self.store.list_invoices())
    }
}
