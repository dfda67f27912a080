//! Command handlers: validate input, call the store, report the outcome.
//!
//! Missing ids are reported as messages, not failures. Validation errors and
//! storage failures abort the command with a non-zero exit.

use crate::args::{
    ClientCommand, ClientFields, ClientUpdate, Commands, InvoiceCommand, InvoiceFields,
    InvoiceUpdate,
};
use crate::format::{format_date, format_timestamp, format_usd};
use anyhow::{Context, Result};
use chrono::Local;
use invoicebook_core::{
    core_version, Client, ClientPatch, DashboardService, Invoice, InvoicePatch, KeyValueStorage,
    NewClient, NewInvoice, RecordStore,
};
use invoicebook_core::model::{normalize_optional_text, normalize_text};
use std::io::Write;

pub fn run<S: KeyValueStorage>(
    command: Commands,
    store: &mut RecordStore<S>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Client(command) => run_client(command, store, out),
        Commands::Invoice(command) => run_invoice(command, store, out),
        Commands::Dashboard => show_dashboard(store, out),
        Commands::Version => {
            writeln!(out, "invoicebook_core {}", core_version())?;
            Ok(())
        }
    }
}

fn run_client<S: KeyValueStorage>(
    command: ClientCommand,
    store: &mut RecordStore<S>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        ClientCommand::Add(fields) => {
            let fields = new_client(fields);
            fields.validate().context("client not saved")?;
            let client = store.add_client(fields)?;
            writeln!(out, "Client added successfully! (id {})", client.id)?;
        }
        ClientCommand::List => {
            let clients = store.list_clients();
            if clients.is_empty() {
                writeln!(out, "No clients found. Add your first client!")?;
            }
            for client in clients {
                write_client(out, client)?;
            }
        }
        ClientCommand::Show { id } => match store.get_client_by_id(id) {
            Some(client) => {
                write_client(out, client)?;
                for invoice in store.invoices_for_client(id) {
                    write_invoice(out, invoice, &client.name)?;
                }
            }
            None => writeln!(out, "No client with id {id}.")?,
        },
        ClientCommand::Update(update) => {
            let id = update.id;
            let patch = client_patch(update);
            patch.validate().context("client not updated")?;
            match store.update_client(id, patch)? {
                Some(_) => writeln!(out, "Client updated successfully!")?,
                None => writeln!(out, "No client with id {id}.")?,
            }
        }
        ClientCommand::Delete { id } => {
            if store.delete_client(id)? {
                writeln!(out, "Client deleted successfully!")?;
            } else {
                writeln!(out, "No client with id {id}.")?;
            }
        }
    }
    Ok(())
}

fn run_invoice<S: KeyValueStorage>(
    command: InvoiceCommand,
    store: &mut RecordStore<S>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        InvoiceCommand::Add(fields) => {
            let fields = new_invoice(fields);
            fields.validate().context("invoice not created")?;
            let invoice = store.add_invoice(fields)?;
            writeln!(out, "Invoice created successfully! (id {})", invoice.id)?;
        }
        InvoiceCommand::List { client } => {
            let invoices: Vec<&Invoice> = match client {
                Some(client_id) => store.invoices_for_client(client_id).collect(),
                None => store.list_invoices().iter().collect(),
            };
            if invoices.is_empty() {
                writeln!(out, "No invoices found. Create your first invoice!")?;
            }
            for invoice in invoices {
                write_invoice(out, invoice, store.client_display_name(invoice))?;
            }
        }
        InvoiceCommand::Show { id } => match store.get_invoice_by_id(id) {
            Some(invoice) => write_invoice(out, invoice, store.client_display_name(invoice))?,
            None => writeln!(out, "No invoice with id {id}.")?,
        },
        InvoiceCommand::Update(update) => {
            let id = update.id;
            let patch = invoice_patch(update);
            patch.validate().context("invoice not updated")?;
            match store.update_invoice(id, patch)? {
                Some(_) => writeln!(out, "Invoice updated successfully!")?,
                None => writeln!(out, "No invoice with id {id}.")?,
            }
        }
        InvoiceCommand::Delete { id } => {
            if store.delete_invoice(id)? {
                writeln!(out, "Invoice deleted successfully!")?;
            } else {
                writeln!(out, "No invoice with id {id}.")?;
            }
        }
        InvoiceCommand::Pay { id } => match store.mark_invoice_as_paid(id)? {
            Some(_) => writeln!(out, "Invoice marked as paid!")?,
            None => writeln!(out, "No invoice with id {id}.")?,
        },
    }
    Ok(())
}

fn show_dashboard<S: KeyValueStorage>(store: &RecordStore<S>, out: &mut impl Write) -> Result<()> {
    let dashboard = DashboardService::new(store);
    let summary = dashboard.summary();
    writeln!(out, "Clients:     {}", summary.total_clients)?;
    writeln!(out, "Invoices:    {}", summary.total_invoices)?;
    writeln!(out, "Revenue:     {}", format_usd(summary.total_revenue))?;
    writeln!(out, "Paid:        {}", summary.paid_invoices)?;
    writeln!(out, "Unpaid:      {}", summary.unpaid_invoices)?;
    writeln!(out, "Outstanding: {}", format_usd(dashboard.outstanding_amount()))?;
    Ok(())
}

fn new_client(fields: ClientFields) -> NewClient {
    let mut client = NewClient::new(fields.name, fields.email);
    if let Some(company) = fields.company {
        client = client.with_company(company);
    }
    if let Some(notes) = fields.notes {
        client = client.with_notes(notes);
    }
    client
}

fn client_patch(update: ClientUpdate) -> ClientPatch {
    ClientPatch {
        name: update.name.map(normalize_text),
        email: update.email.map(normalize_text),
        company: update.company.map(blank_to_none),
        notes: update.notes.map(blank_to_none),
    }
}

fn new_invoice(fields: InvoiceFields) -> NewInvoice {
    let date = fields.date.unwrap_or_else(|| Local::now().date_naive());
    let invoice = NewInvoice::new(fields.client, fields.title, fields.amount, date);
    match fields.description {
        Some(description) => invoice.with_description(description),
        None => invoice,
    }
}

fn invoice_patch(update: InvoiceUpdate) -> InvoicePatch {
    InvoicePatch {
        client_id: update.client,
        title: update.title.map(normalize_text),
        description: update.description.map(blank_to_none),
        amount: update.amount,
        date: update.date,
    }
}

fn blank_to_none(value: String) -> Option<String> {
    normalize_optional_text(Some(value))
}

fn write_client(out: &mut impl Write, client: &Client) -> Result<()> {
    writeln!(out, "#{} {} <{}>", client.id, client.name, client.email)?;
    if let Some(company) = &client.company {
        writeln!(out, "    Company: {company}")?;
    }
    if let Some(notes) = &client.notes {
        writeln!(out, "    Notes: {notes}")?;
    }
    writeln!(out, "    Added: {}", format_timestamp(client.created_at))?;
    Ok(())
}

fn write_invoice(out: &mut impl Write, invoice: &Invoice, client_name: &str) -> Result<()> {
    writeln!(out, "#{} {} [{}]", invoice.id, invoice.title, invoice.status.as_str())?;
    writeln!(out, "    Client: {client_name}")?;
    writeln!(out, "    Amount: {}", format_usd(invoice.amount))?;
    writeln!(out, "    Date: {}", format_date(invoice.date))?;
    if let Some(description) = &invoice.description {
        writeln!(out, "    Description: {description}")?;
    }
    writeln!(out, "    Created: {}", format_timestamp(invoice.created_at))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::args::Cli;
    use clap::Parser;
    use invoicebook_core::{MemoryKeyValueStorage, RecordStore, StoreOptions};

    fn exec(store: &mut RecordStore<MemoryKeyValueStorage>, argv: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("invoicebook").chain(argv.iter().copied()))?;
        let mut out = Vec::new();
        run(cli.command, store, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn store() -> RecordStore<MemoryKeyValueStorage> {
        RecordStore::open(MemoryKeyValueStorage::new(), StoreOptions::default())
    }

    #[test]
    fn invalid_email_is_rejected_before_reaching_the_store() {
        let mut store = store();
        let err = exec(&mut store, &["client", "add", "--name", "Acme", "--email", "nope"])
            .unwrap_err();
        assert!(err.to_string().contains("client not saved"));
        assert!(store.list_clients().is_empty());
    }

    #[test]
    fn orphan_invoice_lists_as_unknown_client_and_pays() {
        let mut store = store();
        exec(
            &mut store,
            &[
                "invoice", "add", "--client", "42", "--title", "Design", "--amount", "500",
                "--date", "2024-01-01",
            ],
        )
        .unwrap();
        let id = store.list_invoices()[0].id.to_string();

        let listing = exec(&mut store, &["invoice", "list"]).unwrap();
        assert!(listing.contains("Client: Unknown Client"));
        assert!(listing.contains("Amount: $500.00"));
        assert!(listing.contains("[unpaid]"));

        let paid = exec(&mut store, &["invoice", "pay", id.as_str()]).unwrap();
        assert!(paid.contains("marked as paid"));
        let again = exec(&mut store, &["invoice", "pay", id.as_str()]).unwrap();
        assert!(again.contains("marked as paid"));

        let dashboard = exec(&mut store, &["dashboard"]).unwrap();
        assert!(dashboard.contains("Paid:        1"));
        assert!(dashboard.contains("Outstanding: $0.00"));
    }

    #[test]
    fn missing_ids_are_reported_not_failed() {
        let mut store = store();
        let output = exec(&mut store, &["client", "delete", "9"]).unwrap();
        assert_eq!(output.trim(), "No client with id 9.");
        let output = exec(&mut store, &["invoice", "pay", "9"]).unwrap();
        assert_eq!(output.trim(), "No invoice with id 9.");
    }

    #[test]
    fn update_with_empty_company_clears_it() {
        let mut store = store();
        exec(
            &mut store,
            &[
                "client", "add", "--name", "Acme", "--email", "a@acme.com", "--company", "Acme Ltd",
            ],
        )
        .unwrap();
        let id = store.list_clients()[0].id.to_string();

        exec(&mut store, &["client", "update", id.as_str(), "--company", ""]).unwrap();
        let client = &store.list_clients()[0];
        assert_eq!(client.company, None);
        assert_eq!(client.name, "Acme");
    }

    #[test]
    fn update_trims_text_fields() {
        let mut store = store();
        exec(&mut store, &["client", "add", "--name", "Acme", "--email", "a@acme.com"]).unwrap();
        let client_id = store.list_clients()[0].id.to_string();
        exec(
            &mut store,
            &[
                "invoice", "add", "--client", client_id.as_str(), "--title", "Design", "--amount",
                "500", "--date", "2024-01-01",
            ],
        )
        .unwrap();
        let invoice_id = store.list_invoices()[0].id.to_string();

        exec(
            &mut store,
            &[
                "client", "update", client_id.as_str(), "--name", "  Beta  ", "--email",
                " b@beta.io ", "--notes", "   ",
            ],
        )
        .unwrap();
        exec(
            &mut store,
            &["invoice", "update", invoice_id.as_str(), "--title", "\tAudit \n"],
        )
        .unwrap();

        let client = &store.list_clients()[0];
        assert_eq!(client.name, "Beta");
        assert_eq!(client.email, "b@beta.io");
        assert_eq!(client.notes, None);
        assert_eq!(store.list_invoices()[0].title, "Audit");
    }
}
