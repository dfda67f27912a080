//! Client record.

use super::{blank_as_none, normalize_optional_text, normalize_text};
use super::{NewRecord, Record, RecordId, RecordPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ClientId = RecordId;

/// A billed customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub company: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Client {
    const STORAGE_KEY: &'static str = "clients";
    const KIND: &'static str = "client";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Fields submitted when registering a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub notes: Option<String>,
}

impl NewClient {
    /// Builds a payload from trimmed name and email.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: normalize_text(name),
            email: normalize_text(email),
            company: None,
            notes: None,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = normalize_optional_text(Some(company.into()));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = normalize_optional_text(Some(notes.into()));
        self
    }
}

impl NewRecord for NewClient {
    type Record = Client;

    fn into_record(self, id: RecordId, created_at: DateTime<Utc>) -> Client {
        Client {
            id,
            name: self.name,
            email: self.email,
            company: self.company,
            notes: self.notes,
            created_at,
        }
    }
}

/// Shallow client update. `None` keeps the stored value; for optional text,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl ClientPatch {
    /// Full replacement of every editable field, as submitted by an edit form.
    pub fn replace_all(fields: NewClient) -> Self {
        Self {
            name: Some(fields.name),
            email: Some(fields.email),
            company: Some(fields.company),
            notes: Some(fields.notes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.company.is_none() && self.notes.is_none()
    }
}

impl RecordPatch<Client> for ClientPatch {
    fn apply_to(self, record: &mut Client) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(email) = self.email {
            record.email = email;
        }
        if let Some(company) = self.company {
            record.company = company;
        }
        if let Some(notes) = self.notes {
            record.notes = notes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Client, ClientPatch, NewClient};
    use crate::model::{NewRecord, RecordPatch};
    use chrono::{TimeZone, Utc};

    fn sample() -> Client {
        NewClient::new("Acme", "a@acme.com")
            .with_company("Acme Ltd")
            .into_record(7, Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap())
    }

    #[test]
    fn serializes_with_camel_case_and_omits_missing_optionals() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["company"], "Acme Ltd");
        assert_eq!(json["createdAt"], "2024-01-01T09:30:00Z");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn deserializes_browser_shaped_record_with_blank_optionals() {
        let raw = r#"{
            "id": 1704067200000,
            "name": "Acme",
            "email": "a@acme.com",
            "company": "",
            "notes": "  ",
            "createdAt": "2024-01-01T00:00:00.000Z"
        }"#;
        let client: Client = serde_json::from_str(raw).unwrap();
        assert_eq!(client.id, 1_704_067_200_000);
        assert_eq!(client.company, None);
        assert_eq!(client.notes, None);
    }

    #[test]
    fn patch_keeps_omitted_fields_and_can_clear_optionals() {
        let mut client = sample();
        let patch = ClientPatch {
            company: Some(None),
            notes: Some(Some("net 30".to_string())),
            ..ClientPatch::default()
        };
        patch.apply_to(&mut client);

        assert_eq!(client.name, "Acme");
        assert_eq!(client.company, None);
        assert_eq!(client.notes.as_deref(), Some("net 30"));
    }

    #[test]
    fn new_client_trims_inputs() {
        let fields = NewClient::new("  Acme ", " a@acme.com ").with_notes("   ");
        assert_eq!(fields.name, "Acme");
        assert_eq!(fields.email, "a@acme.com");
        assert_eq!(fields.notes, None);
        assert!(ClientPatch::default().is_empty());
    }
}
