//! Client/invoice record store over durable key-value storage.

use super::{Collection, StoreResult};
use crate::model::client::{Client, ClientId, ClientPatch, NewClient};
use crate::model::invoice::{Invoice, InvoiceId, InvoicePatch, InvoiceStatus, NewInvoice};
use crate::storage::{KeyValueStorage, SqliteKeyValueStorage};
use log::info;
use std::path::Path;

/// Display name used for invoices whose client no longer exists.
pub const UNKNOWN_CLIENT_NAME: &str = "Unknown Client";

/// Behavior switches for a store instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Re-validate add/update payloads inside the store. Off by default:
    /// validation is the caller's job and the store persists what it is given.
    pub strict_validation: bool,
}

impl StoreOptions {
    pub fn strict() -> Self {
        Self {
            strict_validation: true,
        }
    }
}

/// Owner of the client and invoice collections.
///
/// Each instance loads storage once in [`RecordStore::open`] and is the only
/// writer afterwards. Collaborators hold a reference to the store rather than
/// touching storage directly.
pub struct RecordStore<S: KeyValueStorage> {
    storage: S,
    clients: Collection<Client>,
    invoices: Collection<Invoice>,
    options: StoreOptions,
}

impl RecordStore<SqliteKeyValueStorage> {
    /// Opens a store backed by the SQLite file at `path`.
    pub fn open_file(path: impl AsRef<Path>, options: StoreOptions) -> StoreResult<Self> {
        let storage = SqliteKeyValueStorage::open(path)?;
        Ok(Self::open(storage, options))
    }
}

impl<S: KeyValueStorage> RecordStore<S> {
    /// Loads both collections from `storage`. Absent or unreadable data
    /// starts empty, so opening never fails.
    pub fn open(storage: S, options: StoreOptions) -> Self {
        let clients = Collection::<Client>::load(&storage);
        let invoices = Collection::<Invoice>::load(&storage);
        info!(
            "event=store_open module=repo status=ok clients={} invoices={} strict={}",
            clients.len(),
            invoices.len(),
            options.strict_validation
        );
        Self {
            storage,
            clients,
            invoices,
            options,
        }
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn list_clients(&self) -> &[Client] {
        self.clients.records()
    }

    pub fn get_client_by_id(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(id)
    }

    pub fn add_client(&mut self, fields: NewClient) -> StoreResult<Client> {
        if self.options.strict_validation {
            fields.validate()?;
        }
        self.clients.add(fields, &mut self.storage)
    }

    /// Returns `Ok(None)` when `id` is unknown; nothing is written then.
    pub fn update_client(&mut self, id: ClientId, patch: ClientPatch) -> StoreResult<Option<Client>> {
        if self.options.strict_validation {
            patch.validate()?;
        }
        self.clients.update(id, patch, &mut self.storage)
    }

    /// Deletes one client. Invoices referencing it are left in place.
    pub fn delete_client(&mut self, id: ClientId) -> StoreResult<bool> {
        self.clients.delete(id, &mut self.storage)
    }

    pub fn list_invoices(&self) -> &[Invoice] {
        self.invoices.records()
    }

    pub fn get_invoice_by_id(&self, id: InvoiceId) -> Option<&Invoice> {
        self.invoices.get(id)
    }

    /// Adds an unpaid invoice. The client reference is not checked.
    pub fn add_invoice(&mut self, fields: NewInvoice) -> StoreResult<Invoice> {
        if self.options.strict_validation {
            fields.validate()?;
        }
        self.invoices.add(fields, &mut self.storage)
    }

    pub fn update_invoice(
        &mut self,
        id: InvoiceId,
        patch: InvoicePatch,
    ) -> StoreResult<Option<Invoice>> {
        if self.options.strict_validation {
            patch.validate()?;
        }
        self.invoices.update(id, patch, &mut self.storage)
    }

    pub fn delete_invoice(&mut self, id: InvoiceId) -> StoreResult<bool> {
        self.invoices.delete(id, &mut self.storage)
    }

    /// Sets status to paid and persists, even when already paid.
    ///
    /// Other fields are not re-validated, regardless of strict mode.
    pub fn mark_invoice_as_paid(&mut self, id: InvoiceId) -> StoreResult<Option<Invoice>> {
        self.invoices.modify(
            id,
            |invoice| invoice.status = InvoiceStatus::Paid,
            &mut self.storage,
        )
    }

    /// Invoices referencing `client_id`, in insertion order.
    pub fn invoices_for_client(&self, client_id: ClientId) -> impl Iterator<Item = &Invoice> {
        self.invoices
            .records()
            .iter()
            .filter(move |invoice| invoice.client_id == client_id)
    }

    /// Name of the invoice's client, or [`UNKNOWN_CLIENT_NAME`] for orphans.
    pub fn client_display_name(&self, invoice: &Invoice) -> &str {
        self.get_client_by_id(invoice.client_id)
            .map_or(UNKNOWN_CLIENT_NAME, |client| client.name.as_str())
    }
}
