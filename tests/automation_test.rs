//! How the automation client classifies each kind of reply.
//!
//! Run with: `cargo test --test automation_test`
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use contracthub_backend::automation::{AutomationClient, AutomationError, AutomationReply};
use contracthub_backend::models::contracts::{Model, Status};

fn contract() -> Model {
    Model {
        id: Uuid::new_v4(),
        contract_number: "CNT-20261018-A1B2C3".to_string(),
        first_party_id: Uuid::new_v4(),
        second_party_id: Uuid::new_v4(),
        promoter_id: None,
        start_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2027, 10, 31).unwrap(),
        email: "hr@falcon.om".to_string(),
        job_title: None,
        work_location: None,
        status: Status::Queued,
        pdf_url: None,
        error_message: None,
        created_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

async fn client_for(response: ResponseTemplate) -> (MockServer, AutomationClient) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(response)
        .mount(&server)
        .await;
    let client = AutomationClient::new(Some(server.uri()), Duration::from_millis(500));
    (server, client)
}

#[tokio::test]
async fn json_reply_is_parsed() {
    let contract = contract();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "contract_number": "CNT-20261018-A1B2C3",
            "promoter_id": null,
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "queued": true })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let client = AutomationClient::new(Some(server.uri()), Duration::from_secs(2));

    let reply = client.trigger(&contract).await.unwrap();
    assert_eq!(
        reply,
        AutomationReply::Json(serde_json::json!({ "queued": true }))
    );
}

#[tokio::test]
async fn plain_text_reply_counts_as_success() {
    let (_server, client) =
        client_for(ResponseTemplate::new(200).set_body_string("Accepted")).await;

    let reply = client.trigger(&contract()).await.unwrap();
    assert_eq!(reply, AutomationReply::Text("Accepted".to_string()));
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let (_server, client) = client_for(
        ResponseTemplate::new(200).set_body_raw("{\"queued\": tru", "application/json"),
    )
    .await;

    let err = client.trigger(&contract()).await.unwrap_err();
    assert!(matches!(err, AutomationError::Decode(_)));
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let (_server, client) =
        client_for(ResponseTemplate::new(500).set_body_string("scenario is disabled")).await;

    let err = client.trigger(&contract()).await.unwrap_err();
    match &err {
        AutomationError::Status { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "scenario is disabled");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
    assert!(err.to_string().contains("HTTP 500"));
}

#[tokio::test]
async fn slow_service_times_out() {
    let (_server, client) =
        client_for(ResponseTemplate::new(200).set_delay(Duration::from_secs(3))).await;

    let err = client.trigger(&contract()).await.unwrap_err();
    assert!(matches!(err, AutomationError::Timeout(d) if d == Duration::from_millis(500)));
}

#[tokio::test]
async fn unconfigured_client_refuses_to_trigger() {
    let client = AutomationClient::new(None, Duration::from_secs(1));
    let err = client.trigger(&contract()).await.unwrap_err();
    assert!(matches!(err, AutomationError::NotConfigured));
}
