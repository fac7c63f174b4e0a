use std::sync::Arc;
use std::time::Duration;

use funnel_core::{RecordStatus, SimulationRequest, TargetGender};
use funnel_engine::{
    HttpRecorder, MemoryRecorder, RecordDispatch, RecordError, Recorder, RecorderHandle,
    RecorderSettings,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> SimulationRequest {
    SimulationRequest {
        gender: TargetGender::Female,
        phone_number: "923123456".to_string(),
        step: "processing".to_string(),
    }
}

fn recorder_for(server: &MockServer) -> HttpRecorder {
    let base = url::Url::parse(&server.uri()).unwrap();
    HttpRecorder::new(RecorderSettings::new(base))
}

#[tokio::test]
async fn posts_camel_case_json_and_parses_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/simulations"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "gender": "female",
            "phoneNumber": "923123456",
            "step": "processing",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 17,
            "gender": "female",
            "phoneNumber": "923123456",
            "step": "processing",
            "createdAt": "2026-01-02T03:04:05Z",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = recorder_for(&server).create(&request()).await.expect("record ok");
    assert_eq!(record.id, 17);
    assert_eq!(record.phone_number.as_deref(), Some("923123456"));
    assert_eq!(
        record.created_at.map(|at| at.to_rfc3339()),
        Some("2026-01-02T03:04:05+00:00".to_string())
    );
}

#[test]
fn endpoint_keeps_the_base_path_prefix() {
    let endpoint = |base: &str| {
        HttpRecorder::new(RecorderSettings::new(url::Url::parse(base).unwrap()))
            .endpoint()
            .unwrap()
            .to_string()
    };
    assert_eq!(endpoint("https://host"), "https://host/api/simulations");
    assert_eq!(endpoint("https://host/app/"), "https://host/app/api/simulations");
    assert_eq!(endpoint("https://host/app"), "https://host/app/api/simulations");
}

#[test]
fn endpoint_rejects_cannot_be_a_base_urls() {
    let recorder = HttpRecorder::new(RecorderSettings::new(
        url::Url::parse("mailto:ops@example.com").unwrap(),
    ));
    assert!(matches!(recorder.endpoint(), Err(RecordError::InvalidUrl(_))));
}

#[tokio::test]
async fn base_path_prefix_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/api/simulations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3,
            "gender": "female",
            "phoneNumber": "923123456",
            "step": "processing",
            "createdAt": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base = url::Url::parse(&format!("{}/app/", server.uri())).unwrap();
    let record = HttpRecorder::new(RecorderSettings::new(base))
        .create(&request())
        .await
        .expect("record ok");
    assert_eq!(record.id, 3);
    assert_eq!(record.created_at, None);
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/simulations"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = recorder_for(&server).create(&request()).await.unwrap_err();
    assert_eq!(err, RecordError::HttpStatus(500));
}

#[tokio::test]
async fn malformed_body_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/simulations"))
        .respond_with(ResponseTemplate::new(201).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = recorder_for(&server).create(&request()).await.unwrap_err();
    assert!(matches!(err, RecordError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_maps_to_network_error() {
    let base = url::Url::parse("http://127.0.0.1:9").unwrap();
    let recorder = HttpRecorder::new(RecorderSettings::new(base));
    let err = recorder.create(&request()).await.unwrap_err();
    assert!(matches!(err, RecordError::Network(_)));
}

#[tokio::test]
async fn memory_recorder_assigns_sequential_ids() {
    let recorder = MemoryRecorder::new();
    let first = recorder.create(&request()).await.unwrap();
    let second = recorder.create(&request()).await.unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.gender, "female");
    assert!(first.created_at.is_some());
    assert_eq!(recorder.records().len(), 2);
}

fn wait_for_outcome(handle: &RecorderHandle) -> RecordStatus {
    for _ in 0..200 {
        if let Some(status) = handle.poll_outcome() {
            return status;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("recorder outcome never arrived");
}

#[test]
fn handle_reports_stored_record() {
    let memory = Arc::new(MemoryRecorder::new());
    let handle = RecorderHandle::new(memory.clone());
    handle.dispatch(request());

    assert_eq!(wait_for_outcome(&handle), RecordStatus::Stored { id: 1 });
    assert_eq!(memory.records().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn handle_reports_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let handle = RecorderHandle::new(Arc::new(recorder_for(&server)));
    handle.dispatch(request());
    let status = tokio::task::spawn_blocking(move || wait_for_outcome(&handle))
        .await
        .unwrap();
    assert_eq!(
        status,
        RecordStatus::Failed {
            reason: "http status 503".to_string()
        }
    );
}
