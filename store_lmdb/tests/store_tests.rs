//! LMDB backend tests: persistence round-trip, compare-and-set
//! semantics, and index maintenance across transitions.

use fichua_store::reveal::{RevealRecord, RevealStore, TransitionUpdate};
use fichua_store::StoreError;
use fichua_store_lmdb::{LmdbEnvironment, LmdbRevealStore};
use fichua_types::{
    Amount, ContactCard, GatewayTxnId, Msisdn, RevealId, RevealStatus, TargetRef, TargetType,
    Timestamp,
};

fn temp_store() -> (tempfile::TempDir, LmdbRevealStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).expect("open env");
    let store = env.reveal_store();
    (dir, store)
}

fn make_record(status: RevealStatus) -> RevealRecord {
    let now = Timestamp::new(1_000_000);
    RevealRecord {
        id: RevealId::generate(),
        requester: Msisdn::parse("+254700000001").unwrap(),
        target: TargetRef::new(TargetType::Fundi, "42"),
        amount: Amount::new(150),
        status,
        gateway_txn_id: None,
        contact_snapshot: Some(ContactCard {
            name: "Juma Otieno".to_string(),
            phone: "+254711222333".to_string(),
            email: "juma@example.com".to_string(),
        }),
        failure_reason: None,
        created_at: now,
        updated_at: now,
        expires_at: now.plus_secs(600),
    }
}

#[test]
fn put_get_roundtrip() {
    let (_dir, store) = temp_store();
    let record = make_record(RevealStatus::Initiated);

    store.put(&record).unwrap();
    let loaded = store.get(&record.id).unwrap();

    assert_eq!(loaded.id, record.id);
    assert_eq!(loaded.requester, record.requester);
    assert_eq!(loaded.target, record.target);
    assert_eq!(loaded.status, RevealStatus::Initiated);
    assert_eq!(loaded.contact_snapshot, record.contact_snapshot);
    assert_eq!(loaded.expires_at, record.expires_at);
}

#[test]
fn get_missing_is_not_found() {
    let (_dir, store) = temp_store();
    let err = store.get(&RevealId::new("deadbeef")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn duplicate_id_rejected() {
    let (_dir, store) = temp_store();
    let record = make_record(RevealStatus::Initiated);
    store.put(&record).unwrap();
    let err = store.put(&record).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));
}

#[test]
fn second_active_record_for_tuple_rejected() {
    let (_dir, store) = temp_store();
    store.put(&make_record(RevealStatus::Initiated)).unwrap();
    let err = store.put(&make_record(RevealStatus::Initiated)).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));
}

#[test]
fn tuple_freed_after_terminal_transition() {
    let (_dir, store) = temp_store();
    let first = make_record(RevealStatus::Initiated);
    store.put(&first).unwrap();

    assert!(store.compare_and_set_status(
        &first.id,
        RevealStatus::Initiated,
        RevealStatus::Failed,
        TransitionUpdate::default(),
    )
    .unwrap());

    // A new request for the same tuple is allowed again.
    store.put(&make_record(RevealStatus::Initiated)).unwrap();
}

#[test]
fn cas_applies_update_fields() {
    let (_dir, store) = temp_store();
    let record = make_record(RevealStatus::Initiated);
    store.put(&record).unwrap();

    let applied = store
        .compare_and_set_status(
            &record.id,
            RevealStatus::Initiated,
            RevealStatus::AwaitingConfirmation,
            TransitionUpdate {
                gateway_txn_id: Some(GatewayTxnId::new("TX1")),
                updated_at: Some(Timestamp::new(1_000_005)),
                ..TransitionUpdate::default()
            },
        )
        .unwrap();
    assert!(applied);

    let loaded = store.get(&record.id).unwrap();
    assert_eq!(loaded.status, RevealStatus::AwaitingConfirmation);
    assert_eq!(loaded.gateway_txn_id, Some(GatewayTxnId::new("TX1")));
    assert_eq!(loaded.updated_at, Timestamp::new(1_000_005));
}

#[test]
fn cas_loser_changes_nothing() {
    let (_dir, store) = temp_store();
    let record = make_record(RevealStatus::Initiated);
    store.put(&record).unwrap();

    store
        .compare_and_set_status(
            &record.id,
            RevealStatus::Initiated,
            RevealStatus::AwaitingConfirmation,
            TransitionUpdate {
                gateway_txn_id: Some(GatewayTxnId::new("TX1")),
                ..TransitionUpdate::default()
            },
        )
        .unwrap();
    store
        .compare_and_set_status(
            &record.id,
            RevealStatus::AwaitingConfirmation,
            RevealStatus::Completed,
            TransitionUpdate::default(),
        )
        .unwrap();

    // Late conflicting delivery loses and leaves the record untouched.
    let applied = store
        .compare_and_set_status(
            &record.id,
            RevealStatus::AwaitingConfirmation,
            RevealStatus::Failed,
            TransitionUpdate {
                failure_reason: Some("declined".to_string()),
                ..TransitionUpdate::default()
            },
        )
        .unwrap();
    assert!(!applied);

    let loaded = store.get(&record.id).unwrap();
    assert_eq!(loaded.status, RevealStatus::Completed);
    assert!(loaded.failure_reason.is_none());
}

#[test]
fn gateway_txn_index_lookup() {
    let (_dir, store) = temp_store();
    let record = make_record(RevealStatus::Initiated);
    store.put(&record).unwrap();
    store
        .compare_and_set_status(
            &record.id,
            RevealStatus::Initiated,
            RevealStatus::AwaitingConfirmation,
            TransitionUpdate {
                gateway_txn_id: Some(GatewayTxnId::new("TX77")),
                ..TransitionUpdate::default()
            },
        )
        .unwrap();

    let loaded = store.get_by_gateway_txn(&GatewayTxnId::new("TX77")).unwrap();
    assert_eq!(loaded.id, record.id);

    let err = store
        .get_by_gateway_txn(&GatewayTxnId::new("TX78"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn find_active_scoped_to_non_terminal() {
    let (_dir, store) = temp_store();
    let record = make_record(RevealStatus::Initiated);
    store.put(&record).unwrap();

    let found = store
        .find_active(&record.requester, &record.target)
        .unwrap()
        .expect("active record");
    assert_eq!(found.id, record.id);

    store
        .compare_and_set_status(
            &record.id,
            RevealStatus::Initiated,
            RevealStatus::Failed,
            TransitionUpdate::default(),
        )
        .unwrap();
    assert!(store
        .find_active(&record.requester, &record.target)
        .unwrap()
        .is_none());
}

#[test]
fn list_active_covers_both_non_terminal_statuses() {
    let (_dir, store) = temp_store();

    let mut awaiting = make_record(RevealStatus::Initiated);
    awaiting.target = TargetRef::new(TargetType::Property, "p1");
    store.put(&awaiting).unwrap();
    store
        .compare_and_set_status(
            &awaiting.id,
            RevealStatus::Initiated,
            RevealStatus::AwaitingConfirmation,
            TransitionUpdate::default(),
        )
        .unwrap();

    let mut initiated = make_record(RevealStatus::Initiated);
    initiated.target = TargetRef::new(TargetType::Stay, "s1");
    store.put(&initiated).unwrap();

    let mut failed = make_record(RevealStatus::Initiated);
    failed.target = TargetRef::new(TargetType::Fundi, "f1");
    store.put(&failed).unwrap();
    store
        .compare_and_set_status(
            &failed.id,
            RevealStatus::Initiated,
            RevealStatus::Failed,
            TransitionUpdate::default(),
        )
        .unwrap();

    let mut listed: Vec<_> = store
        .list_active()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    listed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    let mut expected = vec![awaiting.id.clone(), initiated.id.clone()];
    expected.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(listed, expected);
}

#[test]
fn records_survive_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let record = make_record(RevealStatus::Initiated);

    {
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).expect("open env");
        env.reveal_store().put(&record).unwrap();
    }

    let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).expect("reopen env");
    let store = env.reveal_store();
    let loaded = store.get(&record.id).unwrap();
    assert_eq!(loaded.id, record.id);
    assert_eq!(store.reveal_count().unwrap(), 1);
}
