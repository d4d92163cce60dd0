//! End-to-end generation handshake against an in-memory database and mocked
//! automation and notification services.
//!
//! Run with: `cargo test --test handshake_test`
mod common;

use std::time::Duration;

use sea_orm::{EntityTrait, PaginatorTrait};
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use contracthub_backend::automation::{AutomationClient, ChannelNotifier};
use contracthub_backend::db::{
    audit_logs as audit_db, contracts as contract_db, notifications as notification_db,
};
use contracthub_backend::generation::GenerationError;
use contracthub_backend::generation::callback::{
    CallbackRequest, ContractRef, apply_callback, prepare_payload,
};
use contracthub_backend::generation::lifecycle::{self, TransitionError};
use contracthub_backend::generation::submission::submit_contract;
use contracthub_backend::models::contracts::{self, Status};
use contracthub_backend::models::notifications::Kind;
use contracthub_backend::realtime::{ContractEvent, RealtimeHub};
use contracthub_backend::store::{ContractKey, ContractStore};

async fn automation_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accepted": true
        })))
        .mount(&server)
        .await;
    server
}

fn automation_client(server: &MockServer) -> AutomationClient {
    AutomationClient::new(
        Some(format!("{}/hooks/generate", server.uri())),
        Duration::from_secs(5),
    )
}

fn by_number(contract: &contracts::Model) -> ContractRef {
    ContractRef {
        contract_number: Some(contract.contract_number.clone()),
        contract_id: None,
    }
}

fn completed(contract: &contracts::Model, pdf_url: &str) -> CallbackRequest {
    CallbackRequest {
        contract: by_number(contract),
        status: Some("completed".to_string()),
        pdf_url: Some(pdf_url.to_string()),
        error_message: None,
    }
}

fn drain(rx: &mut UnboundedReceiver<ContractEvent>) -> Vec<ContractEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn submitted_contract_completes_and_the_store_follows() {
    let db = common::test_db().await;
    let (first, second, promoter) = common::seeded(&db).await;
    let automation_mock = automation_server().await;
    let automation = automation_client(&automation_mock);
    let notifier = ChannelNotifier::disabled();
    let hub = RealtimeHub::new();
    let (_, mut rx) = hub.subscribe().await;

    let contract = submit_contract(
        &db,
        &automation,
        &hub,
        None,
        common::submission(first.id, second.id, Some(promoter.id)),
    )
    .await
    .expect("submission should succeed");

    assert_eq!(contract.status, Status::Queued);
    assert!(contract.contract_number.starts_with("CNT-"));
    assert!(contract.pdf_url.is_none());

    // The trigger carried the identifiers of the stored row.
    let requests = automation_mock.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let trigger: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(trigger["contract_number"], contract.contract_number.as_str());
    assert_eq!(trigger["contract_id"], contract.id.to_string());

    let payload = prepare_payload(&db, &hub, &by_number(&contract))
        .await
        .expect("payload should build");
    assert_eq!(payload.status, "processing");
    assert_eq!(payload.first_party_name_ar, "شركة الصقر للتجارة");

    let change = apply_callback(
        &db,
        &hub,
        &notifier,
        &completed(&contract, "https://files.example.com/contracts/signed.pdf"),
    )
    .await
    .expect("callback should apply");
    assert!(change.applied);
    assert_eq!(change.contract.status, Status::Completed);
    assert!(lifecycle::is_consistent(&change.contract));

    let mut store = ContractStore::new();
    for event in drain(&mut rx) {
        store.apply(event);
    }
    let mirrored = store
        .get(&ContractKey::Number(contract.contract_number.clone()))
        .expect("store should hold the contract");
    assert_eq!(mirrored.status, Status::Completed);
    assert_eq!(
        mirrored.pdf_url.as_deref(),
        Some("https://files.example.com/contracts/signed.pdf")
    );
    assert_eq!(store.statistics().completed, 1);

    let notes = notification_db::get_notifications_for_contract(&db, contract.id)
        .await
        .unwrap();
    let kinds: Vec<Kind> = notes.iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![Kind::Info, Kind::Success]);

    // created, queued -> processing, processing -> completed
    let history = audit_db::get_audit_logs_for_entity(&db, contract.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].action, "contract.created");
}

#[tokio::test]
async fn same_party_twice_persists_nothing() {
    let db = common::test_db().await;
    let (first, _, _) = common::seeded(&db).await;
    let automation_mock = automation_server().await;
    let hub = RealtimeHub::new();

    let err = submit_contract(
        &db,
        &automation_client(&automation_mock),
        &hub,
        None,
        common::submission(first.id, first.id, None),
    )
    .await
    .unwrap_err();

    match err {
        GenerationError::Validation(fields) => {
            assert!(fields.get("second_party_id").is_some());
        }
        other => panic!("expected a validation error, got {other:?}"),
    }

    let stored = contracts::Entity::find().count(&db).await.unwrap();
    assert_eq!(stored, 0);
    assert!(automation_mock.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_party_is_a_field_error() {
    let db = common::test_db().await;
    let (first, _, _) = common::seeded(&db).await;
    let hub = RealtimeHub::new();
    let automation = AutomationClient::new(None, Duration::from_secs(1));

    let err = submit_contract(
        &db,
        &automation,
        &hub,
        None,
        common::submission(first.id, uuid::Uuid::new_v4(), None),
    )
    .await
    .unwrap_err();

    assert!(
        matches!(err, GenerationError::Validation(ref f) if f.get("second_party_id").is_some())
    );
}

#[tokio::test]
async fn automation_timeout_marks_contract_failed() {
    let db = common::test_db().await;
    let (first, second, _) = common::seeded(&db).await;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    let automation = AutomationClient::new(Some(server.uri()), Duration::from_millis(200));
    let hub = RealtimeHub::new();

    let contract = submit_contract(
        &db,
        &automation,
        &hub,
        None,
        common::submission(first.id, second.id, None),
    )
    .await
    .expect("integration failures are not returned as errors");

    assert_eq!(contract.status, Status::Failed);
    assert!(contract.pdf_url.is_none());
    let message = contract.error_message.as_deref().unwrap_or_default();
    assert!(message.contains("timed out"), "unexpected message: {message}");
    assert!(lifecycle::is_consistent(&contract));

    let notes = notification_db::get_notifications_for_contract(&db, contract.id)
        .await
        .unwrap();
    assert_eq!(notes.last().map(|n| n.kind), Some(Kind::Error));
}

#[tokio::test]
async fn unconfigured_automation_leaves_contract_pending() {
    let db = common::test_db().await;
    let (first, second, _) = common::seeded(&db).await;
    let hub = RealtimeHub::new();
    let automation = AutomationClient::new(None, Duration::from_secs(1));

    let contract = submit_contract(
        &db,
        &automation,
        &hub,
        None,
        common::submission(first.id, second.id, None),
    )
    .await
    .unwrap();

    assert_eq!(contract.status, Status::Pending);
    assert!(contract.error_message.is_none());
}

#[tokio::test]
async fn replayed_callback_notifies_once() {
    let db = common::test_db().await;
    let (first, second, _) = common::seeded(&db).await;
    let hub = RealtimeHub::new();
    let automation = AutomationClient::new(None, Duration::from_secs(1));

    let channel = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&channel)
        .await;
    let notifier = ChannelNotifier::new(Some(format!("{}/channel", channel.uri())));

    let contract = submit_contract(
        &db,
        &automation,
        &hub,
        None,
        common::submission(first.id, second.id, None),
    )
    .await
    .unwrap();
    let callback = completed(&contract, "https://files.example.com/a.pdf");

    let first_call = apply_callback(&db, &hub, &notifier, &callback).await.unwrap();
    let second_call = apply_callback(&db, &hub, &notifier, &callback).await.unwrap();

    assert!(first_call.applied);
    assert!(!second_call.applied);
    assert_eq!(second_call.contract, first_call.contract);
    assert!(lifecycle::is_consistent(&second_call.contract));

    let successes = notification_db::get_notifications_for_contract(&db, contract.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|n| n.kind == Kind::Success)
        .count();
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn completed_without_pdf_url_is_rejected() {
    let db = common::test_db().await;
    let (first, second, _) = common::seeded(&db).await;
    let hub = RealtimeHub::new();
    let automation = AutomationClient::new(None, Duration::from_secs(1));
    let contract = submit_contract(
        &db,
        &automation,
        &hub,
        None,
        common::submission(first.id, second.id, None),
    )
    .await
    .unwrap();

    let mut callback = completed(&contract, "   ");
    let err = apply_callback(&db, &hub, &ChannelNotifier::disabled(), &callback)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Transition(TransitionError::MissingPdfUrl)
    ));

    // Failure is still accepted, with the default message.
    callback.status = Some("failed".to_string());
    callback.pdf_url = None;
    let change = apply_callback(&db, &hub, &ChannelNotifier::disabled(), &callback)
        .await
        .unwrap();
    assert_eq!(change.contract.status, Status::Failed);
    assert_eq!(
        change.contract.error_message.as_deref(),
        Some(lifecycle::DEFAULT_FAILURE_MESSAGE)
    );
    assert!(lifecycle::is_consistent(&change.contract));
}

#[tokio::test]
async fn terminal_contract_cannot_move_again() {
    let db = common::test_db().await;
    let (first, second, _) = common::seeded(&db).await;
    let hub = RealtimeHub::new();
    let automation = AutomationClient::new(None, Duration::from_secs(1));
    let notifier = ChannelNotifier::disabled();
    let contract = submit_contract(
        &db,
        &automation,
        &hub,
        None,
        common::submission(first.id, second.id, None),
    )
    .await
    .unwrap();

    apply_callback(&db, &hub, &notifier, &completed(&contract, "https://x.example/a.pdf"))
        .await
        .unwrap();

    let back_to_processing = CallbackRequest {
        contract: by_number(&contract),
        status: Some("processing".to_string()),
        ..Default::default()
    };
    let err = apply_callback(&db, &hub, &notifier, &back_to_processing)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Transition(TransitionError::Terminal(Status::Completed))
    ));

    // A different URL for an already completed contract is a conflict too.
    let err = apply_callback(&db, &hub, &notifier, &completed(&contract, "https://x.example/b.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Transition(_)));

    let stored = contract_db::get_contract_by_id(&db, contract.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.pdf_url.as_deref(), Some("https://x.example/a.pdf"));
    assert!(lifecycle::is_consistent(&stored));
}

#[tokio::test]
async fn callback_landing_before_trigger_timeout_wins() {
    let db = common::test_db().await;
    let (first, second, _) = common::seeded(&db).await;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    let automation = AutomationClient::new(Some(server.uri()), Duration::from_millis(800));
    let notifier = ChannelNotifier::disabled();
    let hub = RealtimeHub::new();
    let (_, mut rx) = hub.subscribe().await;

    let submit = submit_contract(
        &db,
        &automation,
        &hub,
        None,
        common::submission(first.id, second.id, None),
    );
    // Completes the contract while the trigger request is still in flight.
    let early_callback = async {
        let contract = match rx.recv().await {
            Some(ContractEvent::Inserted { contract }) => contract,
            other => panic!("expected an inserted event, got {other:?}"),
        };
        apply_callback(
            &db,
            &hub,
            &notifier,
            &completed(&contract, "https://files.example.com/early.pdf"),
        )
        .await
    };

    let (submitted, callback) = tokio::join!(submit, early_callback);

    assert!(callback.expect("callback should apply").applied);
    let contract = submitted.expect("a late trigger failure is not returned as an error");
    assert_eq!(contract.status, Status::Completed);
    assert_eq!(
        contract.pdf_url.as_deref(),
        Some("https://files.example.com/early.pdf")
    );
    assert!(lifecycle::is_consistent(&contract));
    assert_eq!(contracts::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn hung_notification_channel_does_not_hold_the_callback() {
    let db = common::test_db().await;
    let (first, second, _) = common::seeded(&db).await;
    let hub = RealtimeHub::new();
    let automation = AutomationClient::new(None, Duration::from_secs(1));

    let channel = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&channel)
        .await;
    let notifier = ChannelNotifier::with_timeout(Some(channel.uri()), Duration::from_millis(300));

    let contract = submit_contract(
        &db,
        &automation,
        &hub,
        None,
        common::submission(first.id, second.id, None),
    )
    .await
    .unwrap();

    let change = tokio::time::timeout(
        Duration::from_secs(5),
        apply_callback(&db, &hub, &notifier, &completed(&contract, "https://x.example/c.pdf")),
    )
    .await
    .expect("callback should not wait on the channel")
    .unwrap();

    assert!(change.applied);
    assert_eq!(change.contract.status, Status::Completed);
}

#[tokio::test]
async fn payload_uses_null_for_missing_images_and_strings_elsewhere() {
    let db = common::test_db().await;
    let (first, second, promoter) = common::seeded(&db).await;
    let hub = RealtimeHub::new();
    let automation = AutomationClient::new(None, Duration::from_secs(1));
    let contract = submit_contract(
        &db,
        &automation,
        &hub,
        None,
        common::submission(first.id, second.id, Some(promoter.id)),
    )
    .await
    .unwrap();

    let payload = prepare_payload(
        &db,
        &hub,
        &ContractRef {
            contract_number: None,
            contract_id: Some(contract.id.to_string()),
        },
    )
    .await
    .unwrap();
    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(json["id_card_url"], "https://files.example.com/id/98765432.png");
    // Entered as whitespace, sent as null.
    assert!(json["passport_url"].is_null());

    for (key, value) in json.as_object().unwrap() {
        if key == "id_card_url" || key == "passport_url" {
            continue;
        }
        assert!(value.is_string(), "{key} should be a string, got {value}");
    }
    assert_eq!(json["passport_number"], "");
    assert_eq!(json["work_location"], "");
    assert_eq!(json["start_date"], "01-11-2026");
}

#[tokio::test]
async fn unknown_contract_reference_is_not_found() {
    let db = common::test_db().await;
    let hub = RealtimeHub::new();

    let err = prepare_payload(
        &db,
        &hub,
        &ContractRef {
            contract_number: Some("CNT-20260101-000000".to_string()),
            contract_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GenerationError::NotFound(_)));

    let err = prepare_payload(&db, &hub, &ContractRef::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::BadRequest(_)));
}
