//! End-to-end reconciliation scenarios against an in-memory row store.

use patchdb::prelude::*;
use patchdb_testing_fixtures::{
    Client, ClientCreate, ClientKind, ClientPatch, Contact, ContactPatch, RecordingStore,
};
use proptest::prelude::*;

fn cid(n: u128) -> RecordId {
    RecordId::from_parts(0, n)
}

fn acme(id: RecordId) -> Client {
    Client {
        id,
        kind: ClientKind::Company,
        register: "12345678000199".to_string(),
        name: "Acme".to_string(),
        legal_name: Some("Acme Ltda".to_string()),
        email: Some("ops@acme.example".to_string()),
        phone: Some("555-0100".to_string()),
        headquarters_id: None,
        updated_at_ms: 0,
        updater: None,
    }
}

fn acme_create(id: RecordId) -> ClientCreate {
    ClientCreate {
        id,
        kind: ClientKind::Company,
        register: "12345678000199".to_string(),
        name: "Acme".to_string(),
        legal_name: None,
        email: None,
        phone: None,
        headquarters_id: None,
    }
}

fn patch(json: &str) -> ClientPatch {
    serde_json::from_str(json).expect("patch payload should decode")
}

// ---- update ------------------------------------------------------------

#[test]
fn named_attribute_is_written_and_the_rest_retained() {
    let id = cid(1);
    let mut store = RecordingStore::new();
    store.seed(&acme(id));

    let outcome = Reconciler::new(&mut store).update(id, &patch(r#"{"name":"Acme Holdings"}"#));

    assert_eq!(outcome, Outcome::OkVoid);
    assert_eq!(
        store.value(id, "name"),
        Some(&FieldValue::from("Acme Holdings"))
    );
    assert_eq!(
        store.value(id, "phone"),
        Some(&FieldValue::from("555-0100")),
        "attributes not named by the payload must keep their stored values"
    );

    let (target, dirty) = &store.dirty_log[0];
    assert_eq!(*target, id);
    assert_eq!(dirty.names().collect::<Vec<_>>(), vec!["name"]);
}

#[test]
fn explicit_null_clears_the_stored_attribute() {
    let id = cid(2);
    let mut store = RecordingStore::new();
    store.seed(&acme(id));

    let outcome = Reconciler::new(&mut store).update(id, &patch(r#"{"phone":null}"#));

    assert_eq!(outcome, Outcome::OkVoid);
    assert_eq!(store.value(id, "phone"), Some(&FieldValue::Null));

    let (_, dirty) = &store.dirty_log[0];
    assert_eq!(dirty.names().collect::<Vec<_>>(), vec!["phone"]);
}

#[test]
fn empty_payload_succeeds_without_touching_storage() {
    let id = cid(3);
    let mut store = RecordingStore::new();
    store.seed(&acme(id));

    let outcome = Reconciler::new(&mut store).update(id, &patch("{}"));

    assert_eq!(outcome, Outcome::OkVoid);
    assert_eq!(store.saves, 0, "a no-op update must not reach the store");
    assert_eq!(store.value(id, "name"), Some(&FieldValue::from("Acme")));
}

#[test]
fn validation_failure_leaves_the_row_untouched() {
    let id = cid(4);
    let mut store = RecordingStore::new();
    store.seed(&acme(id));

    let outcome = Reconciler::new(&mut store).update(id, &patch(r#"{"register":"abc"}"#));

    assert_eq!(outcome.kind(), Some(ErrorKind::Validation));
    assert_eq!(store.saves, 0);
    assert_eq!(
        store.value(id, "register"),
        Some(&FieldValue::from("12345678000199"))
    );
}

#[test]
fn clearing_a_required_attribute_is_rejected() {
    let id = cid(5);
    let mut store = RecordingStore::new();
    store.seed(&acme(id));

    let outcome = Reconciler::new(&mut store).update(id, &patch(r#"{"name":null}"#));

    assert_eq!(outcome.kind(), Some(ErrorKind::Validation));
    assert_eq!(store.saves, 0);
}

#[test]
fn updating_an_unknown_identity_is_not_found() {
    let mut store = RecordingStore::new();

    let outcome = Reconciler::new(&mut store).update(cid(99), &patch(r#"{"name":"Ghost"}"#));

    assert_eq!(outcome.kind(), Some(ErrorKind::NotFound));
}

#[test]
fn audit_stamps_join_the_write_set() {
    let id = cid(6);
    let actor = cid(900);
    let mut store = RecordingStore::new();
    store.seed(&acme(id));

    let outcome = Reconciler::new(&mut store).with_actor(actor).update_with(
        id,
        &patch(r#"{"name":"Acme Holdings"}"#),
        |client, ctx| {
            client.updater = ctx.actor;
            client.updated_at_ms = 1_700_000_000_000;
            Ok(())
        },
    );

    assert_eq!(outcome, Outcome::OkVoid);
    assert_eq!(store.value(id, "updater"), Some(&FieldValue::Id(actor)));
    assert_eq!(
        store.value(id, "updated_at_ms"),
        Some(&FieldValue::from(1_700_000_000_000u64))
    );

    let (_, dirty) = &store.dirty_log[0];
    assert_eq!(
        dirty.names().collect::<Vec<_>>(),
        vec!["name", "updated_at_ms", "updater"],
        "hook drift must join the payload's explicit writes"
    );
}

#[test]
fn cancellation_outranks_the_wrapped_storage_signal() {
    let id = cid(7);
    let mut store = RecordingStore::new();
    store.seed(&acme(id));
    store.fail_next_save(StoreFailure::cancelled(
        FailureSignal::UniqueViolation,
        "duplicate entry '12345678000199'",
    ));

    let outcome = Reconciler::new(&mut store).update(id, &patch(r#"{"name":"Acme Holdings"}"#));

    let err = outcome.err().expect("save failure should surface");
    assert_eq!(err.kind, ErrorKind::Cancelled);
    assert_eq!(
        err.detail.as_deref(),
        Some("duplicate entry '12345678000199'"),
        "the raw backend message survives only as diagnostics detail"
    );
}

// ---- create ------------------------------------------------------------

#[test]
fn create_persists_a_full_row() {
    let id = cid(10);
    let mut store = RecordingStore::new();

    let outcome = Reconciler::new(&mut store).create(acme_create(id));

    assert_eq!(outcome, Outcome::Ok(id));
    assert_eq!(store.value(id, "name"), Some(&FieldValue::from("Acme")));
    assert_eq!(store.value(id, "kind"), Some(&FieldValue::from("company")));
}

#[test]
fn duplicate_identity_create_is_a_conflict() {
    let id = cid(11);
    let mut store = RecordingStore::new();

    assert!(Reconciler::new(&mut store).create(acme_create(id)).is_success());
    let outcome = Reconciler::new(&mut store).create(acme_create(id));

    assert_eq!(outcome.kind(), Some(ErrorKind::Conflict));
    assert_eq!(store.len(), 1);
}

#[test]
fn create_rejects_a_register_kind_mismatch() {
    let mut store = RecordingStore::new();
    let view = ClientCreate {
        kind: ClientKind::Person,
        ..acme_create(cid(12))
    };

    let outcome = Reconciler::new(&mut store).create(view);

    assert_eq!(outcome.kind(), Some(ErrorKind::Validation));
    assert!(store.is_empty());
}

// ---- delete ------------------------------------------------------------

#[test]
fn delete_removes_the_row() {
    let id = cid(20);
    let mut store = RecordingStore::new();
    store.seed(&acme(id));

    let outcome = Reconciler::<Client, _>::new(&mut store).delete(id);

    assert_eq!(outcome, Outcome::OkVoid);
    assert!(!store.contains(id));
}

#[test]
fn delete_of_an_unknown_identity_is_not_found() {
    let mut store = RecordingStore::new();

    let outcome: Outcome<()> = Reconciler::<Client, _>::new(&mut store).delete(cid(21));

    assert_eq!(outcome.kind(), Some(ErrorKind::NotFound));
}

#[test]
fn still_referenced_delete_keeps_the_row() {
    let id = cid(22);
    let mut store = RecordingStore::new();
    store.seed(&acme(id));
    store.fail_next_save(StoreFailure::new(
        FailureSignal::ForeignKeyStillReferenced,
        "contacts still reference client",
    ));

    let outcome = Reconciler::<Client, _>::new(&mut store).delete(id);

    assert_eq!(outcome.kind(), Some(ErrorKind::ReferentialIntegrity));
    assert!(store.contains(id), "a failed save must not apply staged writes");
}

// ---- second record type ------------------------------------------------

#[test]
fn contact_patch_writes_through_the_same_store() {
    let client_id = cid(30);
    let contact_id = cid(31);
    let mut store = RecordingStore::new();
    store.seed(&acme(client_id));
    store.seed(&Contact {
        id: contact_id,
        client_id,
        name: "Dana".to_string(),
        email: Some("dana@acme.example".to_string()),
        role: None,
    });

    let payload: ContactPatch =
        serde_json::from_str(r#"{"role":"buyer","email":null}"#).expect("payload should decode");
    let outcome = Reconciler::new(&mut store).update(contact_id, &payload);

    assert_eq!(outcome, Outcome::OkVoid);
    assert_eq!(store.value(contact_id, "role"), Some(&FieldValue::from("buyer")));
    assert_eq!(store.value(contact_id, "email"), Some(&FieldValue::Null));
    assert_eq!(
        store.value(contact_id, "name"),
        Some(&FieldValue::from("Dana"))
    );
}

// ---- properties --------------------------------------------------------

fn tri_text() -> impl Strategy<Value = TriState<String>> {
    prop_oneof![
        Just(TriState::Absent),
        Just(TriState::Null),
        "[a-z]{1,8}".prop_map(TriState::Value),
    ]
}

fn expected(state: &TriState<String>, seeded: &str) -> FieldValue {
    match state {
        TriState::Absent => FieldValue::from(seeded),
        TriState::Null => FieldValue::Null,
        TriState::Value(v) => FieldValue::from(v.clone()),
    }
}

proptest! {
    #[test]
    fn any_nullable_subset_merges_into_the_stored_row(
        legal_name in tri_text(),
        phone in tri_text(),
    ) {
        let id = cid(40);
        let mut store = RecordingStore::new();
        store.seed(&acme(id));

        let payload = ClientPatch {
            legal_name: legal_name.clone(),
            phone: phone.clone(),
            ..ClientPatch::default()
        };
        let outcome = Reconciler::new(&mut store).update(id, &payload);

        prop_assert!(outcome.is_success());
        prop_assert_eq!(
            store.value(id, "legal_name"),
            Some(&expected(&legal_name, "Acme Ltda"))
        );
        prop_assert_eq!(
            store.value(id, "phone"),
            Some(&expected(&phone, "555-0100"))
        );
        prop_assert_eq!(
            store.value(id, "name"),
            Some(&FieldValue::from("Acme")),
            "unnamed attributes never change"
        );

        let mut named = Vec::new();
        if !legal_name.is_absent() {
            named.push("legal_name");
        }
        if !phone.is_absent() {
            named.push("phone");
        }
        if named.is_empty() {
            prop_assert!(store.dirty_log.is_empty(), "no-op updates never mark fields");
        } else {
            let (_, dirty) = &store.dirty_log[0];
            prop_assert_eq!(dirty.names().collect::<Vec<_>>(), named);
        }
    }

    #[test]
    fn payloads_survive_the_wire_in_every_state(
        legal_name in tri_text(),
        phone in tri_text(),
    ) {
        let payload = ClientPatch {
            legal_name,
            phone,
            ..ClientPatch::default()
        };

        let json = serde_json::to_string(&payload).expect("payload should encode");
        prop_assert!(!json.contains("\"name\""), "absent fields stay off the wire");
        prop_assert!(!json.contains("\"register\""));

        let decoded: ClientPatch = serde_json::from_str(&json).expect("payload should decode");
        prop_assert_eq!(decoded.legal_name, payload.legal_name);
        prop_assert_eq!(decoded.phone, payload.phone);
    }
}
