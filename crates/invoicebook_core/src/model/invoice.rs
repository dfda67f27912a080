//! Invoice record and its one-way payment status.

use super::client::ClientId;
use super::{blank_as_none, normalize_optional_text, normalize_text};
use super::{NewRecord, Record, RecordId, RecordPatch};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type InvoiceId = RecordId;

/// Payment state. Moves only from `Unpaid` to `Paid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Unpaid,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }

    pub fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// A bill raised against a client.
///
/// `client_id` is a soft reference: the client may since have been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub client_id: ClientId,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(deserialize_with = "amount_from_number_or_text")]
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.status.is_paid()
    }
}

impl Record for Invoice {
    const STORAGE_KEY: &'static str = "invoices";
    const KIND: &'static str = "invoice";

    fn id(&self) -> RecordId {
        self.id
    }

    fn unencodable_field(&self) -> Option<&'static str> {
        (!self.amount.is_finite()).then_some("amount")
    }
}

/// Fields submitted when raising an invoice. Status is not a field: every
/// new invoice starts unpaid.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub client_id: ClientId,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
}

impl NewInvoice {
    pub fn new(client_id: ClientId, title: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            client_id,
            title: normalize_text(title),
            description: None,
            amount,
            date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_optional_text(Some(description.into()));
        self
    }
}

impl NewRecord for NewInvoice {
    type Record = Invoice;

    fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> Invoice {
        Invoice {
            id,
            client_id: self.client_id,
            title: self.title,
            description: self.description,
            amount: self.amount,
            date: self.date,
            status: InvoiceStatus::Unpaid,
            created_at,
        }
    }
}

/// Shallow invoice update. Payment status is changed only by marking paid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoicePatch {
    pub client_id: Option<ClientId>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
}

impl InvoicePatch {
    /// Full replacement of every editable field, as submitted by an edit form.
    pub fn replace_all(fields: NewInvoice) -> Self {
        Self {
            client_id: Some(fields.client_id),
            title: Some(fields.title),
            description: Some(fields.description),
            amount: Some(fields.amount),
            date: Some(fields.date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.client_id.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.date.is_none()
    }
}

impl RecordPatch<Invoice> for InvoicePatch {
    fn apply_to(self, record: &mut Invoice) {
        if let Some(client_id) = self.client_id {
            record.client_id = client_id;
        }
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(amount) = self.amount {
            record.amount = amount;
        }
        if let Some(date) = self.date {
            record.date = date;
        }
    }
}

fn amount_from_number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(value) => Ok(value),
        RawAmount::Text(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount `{text}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::{Invoice, InvoicePatch, InvoiceStatus, NewInvoice};
    use crate::model::{NewRecord, Record, RecordPatch};
    use chrono::{NaiveDate, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_invoice_starts_unpaid_and_serializes_status_lowercase() {
        let invoice = NewInvoice::new(42, "Design", 500.0, date(2024, 1, 1)).into_record(1, Utc::now());
        assert_eq!(invoice.status, InvoiceStatus::Unpaid);

        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["status"], "unpaid");
        assert_eq!(json["clientId"], 42);
        assert_eq!(json["date"], "2024-01-01");
    }

    #[test]
    fn deserializes_text_amount_and_missing_status() {
        let raw = r#"{
            "id": 3,
            "clientId": 9,
            "title": "Logo",
            "description": "",
            "amount": "125.50",
            "date": "2024-02-29",
            "createdAt": "2024-02-29T10:00:00.000Z"
        }"#;
        let invoice: Invoice = serde_json::from_str(raw).unwrap();
        assert_eq!(invoice.amount, 125.5);
        assert_eq!(invoice.status, InvoiceStatus::Unpaid);
        assert_eq!(invoice.description, None);
    }

    #[test]
    fn rejects_unparseable_amount_text() {
        let raw = r#"{"id":1,"clientId":1,"title":"x","amount":"abc","date":"2024-01-01","createdAt":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Invoice>(raw).is_err());

        for text in ["NaN", "inf", "-infinity"] {
            let raw = raw.replace("abc", text);
            assert!(serde_json::from_str::<Invoice>(&raw).is_err());
        }
    }

    #[test]
    fn only_finite_amounts_are_encodable() {
        let mut invoice = NewInvoice::new(1, "Design", 500.0, date(2024, 1, 1))
            .into_record(1, Utc::now());
        assert_eq!(invoice.unencodable_field(), None);

        invoice.amount = f64::NAN;
        assert_eq!(invoice.unencodable_field(), Some("amount"));
    }

    #[test]
    fn patch_overwrites_only_supplied_fields() {
        let mut invoice = NewInvoice::new(1, "Design", 500.0, date(2024, 1, 1))
            .with_description("two rounds")
            .into_record(5, Utc::now());
        let before = invoice.clone();

        InvoicePatch {
            amount: Some(650.0),
            ..InvoicePatch::default()
        }
        .apply_to(&mut invoice);

        assert_eq!(invoice.amount, 650.0);
        assert_eq!(invoice.title, before.title);
        assert_eq!(invoice.description, before.description);
        assert_eq!(invoice.date, before.date);
        assert_eq!(invoice.created_at, before.created_at);
    }
}
