use invoicebook_core::{
    ClientPatch, MemoryKeyValueStorage, NewClient, RecordStore, StoreError, StoreOptions,
    ValidationError,
};
use std::collections::HashSet;

#[test]
fn add_assigns_fresh_id_and_timestamp_and_grows_list() {
    let mut store = memory_store();

    let client = store.add_client(NewClient::new("Acme", "a@acme.com")).unwrap();
    assert_eq!(client.name, "Acme");
    assert_eq!(client.email, "a@acme.com");
    assert_eq!(store.list_clients().len(), 1);

    let second = store.add_client(NewClient::new("Beta", "b@beta.io")).unwrap();
    assert_ne!(client.id, second.id);
    assert!(second.created_at >= client.created_at);
}

#[test]
fn add_then_get_returns_equal_record() {
    let mut store = memory_store();
    let created = store
        .add_client(
            NewClient::new("Acme", "a@acme.com")
                .with_company("Acme Ltd")
                .with_notes("prefers email"),
        )
        .unwrap();

    let loaded = store.get_client_by_id(created.id).unwrap();
    assert_eq!(loaded, &created);
}

#[test]
fn ids_stay_distinct_across_many_rapid_adds() {
    let mut store = memory_store();
    let ids: HashSet<_> = (0..500)
        .map(|index| {
            store
                .add_client(NewClient::new(format!("c{index}"), "c@x.io"))
                .unwrap()
                .id
        })
        .collect();
    assert_eq!(ids.len(), 500);
}

#[test]
fn list_keeps_insertion_order() {
    let mut store = memory_store();
    for name in ["first", "second", "third"] {
        store.add_client(NewClient::new(name, "x@y.io")).unwrap();
    }
    let names: Vec<_> = store
        .list_clients()
        .iter()
        .map(|client| client.name.as_str())
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn update_changes_only_supplied_field() {
    let mut store = memory_store();
    let created = store.add_client(NewClient::new("Acme", "a@acme.com")).unwrap();

    let updated = store
        .update_client(
            created.id,
            ClientPatch {
                company: Some(Some("NewCo".to_string())),
                ..ClientPatch::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.company.as_deref(), Some("NewCo"));
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(store.get_client_by_id(created.id), Some(&updated));
}

#[test]
fn full_replacement_update_overwrites_every_editable_field() {
    let mut store = memory_store();
    let created = store
        .add_client(NewClient::new("Acme", "a@acme.com").with_notes("old"))
        .unwrap();

    let updated = store
        .update_client(
            created.id,
            ClientPatch::replace_all(NewClient::new("Acme Two", "two@acme.com")),
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Acme Two");
    assert_eq!(updated.email, "two@acme.com");
    assert_eq!(updated.notes, None);
}

#[test]
fn update_unknown_id_returns_none_without_writing() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = RecordStore::open(storage.clone(), StoreOptions::default());

    let result = store
        .update_client(
            12345,
            ClientPatch {
                name: Some("ghost".to_string()),
                ..ClientPatch::default()
            },
        )
        .unwrap();
    assert!(result.is_none());
    assert!(storage.snapshot().is_empty());
}

#[test]
fn delete_is_final_and_second_delete_returns_false() {
    let mut store = memory_store();
    let created = store.add_client(NewClient::new("Acme", "a@acme.com")).unwrap();

    assert!(store.delete_client(created.id).unwrap());
    assert!(store.get_client_by_id(created.id).is_none());
    assert!(!store.delete_client(created.id).unwrap());
    assert!(store.list_clients().is_empty());
}

#[test]
fn deleted_ids_are_not_reused() {
    let mut store = memory_store();
    let first = store.add_client(NewClient::new("A", "a@x.io")).unwrap();
    store.delete_client(first.id).unwrap();

    let second = store.add_client(NewClient::new("B", "b@x.io")).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn lenient_store_persists_unvalidated_input() {
    let mut store = memory_store();
    let created = store.add_client(NewClient::new("", "not-an-email")).unwrap();
    assert_eq!(store.get_client_by_id(created.id).unwrap().email, "not-an-email");
}

#[test]
fn strict_store_rejects_invalid_client_without_mutating() {
    let storage = MemoryKeyValueStorage::new();
    let mut store = RecordStore::open(storage.clone(), StoreOptions::strict());

    let err = store
        .add_client(NewClient::new("Acme", "not-an-email"))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidEmail(_))
    ));
    assert!(store.list_clients().is_empty());
    assert!(storage.snapshot().is_empty());

    let created = store.add_client(NewClient::new("Acme", "a@acme.com")).unwrap();
    let err = store
        .update_client(
            created.id,
            ClientPatch {
                name: Some("  ".to_string()),
                ..ClientPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyField("name"))
    ));
    assert_eq!(store.get_client_by_id(created.id).unwrap().name, "Acme");
}

fn memory_store() -> RecordStore<MemoryKeyValueStorage> {
    RecordStore::open(MemoryKeyValueStorage::new(), StoreOptions::default())
}
