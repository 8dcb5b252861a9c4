use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};
use workflow_ox::{
    EngineCredentials, Outcome, TaskPayload, WorkflowEngine, WorkflowRequestError,
};

fn engine(server: &MockServer, token: Option<&str>) -> WorkflowEngine {
    let credentials = EngineCredentials::builder()
        .workflow_service_url(server.uri())
        .workflow_run_id("run-123")
        .maybe_token(token)
        .build();
    WorkflowEngine::new(credentials)
}

fn run_body(remaining: bool, outcome: Value) -> Value {
    json!({
        "id": "run-123",
        "applicant_id": "applicant-9",
        "task_id": "task-abc",
        "task_def_id": "upload_document",
        "has_remaining_interactive_tasks": remaining,
        "outcome": outcome,
        "finished": !remaining,
        "config": null,
        "error": null
    })
}

#[tokio::test]
async fn fetch_run_sends_bearer_token_and_parses_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workflow_runs/run-123"))
        .and(header("authorization", "Bearer sdk-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body(true, Value::Null)))
        .expect(1)
        .mount(&server)
        .await;

    let run = engine(&server, Some("sdk-token")).fetch_run().await.unwrap();

    assert!(run.has_remaining_interactive_tasks);
    assert_eq!(run.outcome, None);
    assert_eq!(run.pending_task(), Some("upload_document"));
    assert_eq!(run.outcome_step(), Outcome::Complete);
}

#[tokio::test]
async fn fetch_run_without_token_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workflow_runs/run-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body(false, json!(true))))
        .mount(&server)
        .await;

    let run = engine(&server, None).fetch_run().await.unwrap();
    assert_eq!(run.outcome_step(), Outcome::Pass);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn submit_sends_task_id_and_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workflow_runs/run-123/complete"))
        .and(header("authorization", "Bearer sdk-token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "task_id": "task-abc",
            "data": {"first_name": "Ada", "last_name": "Lovelace"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body(false, json!(false))))
        .expect(1)
        .mount(&server)
        .await;

    let form = json!({"first_name": "Ada", "last_name": "Lovelace"})
        .as_object()
        .cloned()
        .unwrap();
    let run = engine(&server, Some("sdk-token"))
        .submit_task_completion("task-abc", &TaskPayload::Form(form))
        .await
        .unwrap();

    assert_eq!(run.outcome_step(), Outcome::Reject);
}

#[tokio::test]
async fn capture_results_take_precedence_over_form_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workflow_runs/run-123/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body(true, Value::Null)))
        .mount(&server)
        .await;

    let form = json!({"first_name": "Ada"}).as_object().cloned();
    let capture = vec![json!({"id": "doc-front", "type": "passport"})];

    engine(&server, None)
        .complete_task("task-abc", form, Some(capture))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(
        body,
        json!({
            "task_id": "task-abc",
            "data": [{"id": "doc-front", "type": "passport"}]
        })
    );
}

#[tokio::test]
async fn empty_capture_submits_form_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workflow_runs/run-123/complete"))
        .and(body_json(json!({"task_id": "", "data": {"dob": "1990-01-01"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body(true, Value::Null)))
        .expect(1)
        .mount(&server)
        .await;

    let form = json!({"dob": "1990-01-01"}).as_object().cloned();
    // An empty task id is not rejected locally
    engine(&server, None)
        .complete_task("", form, Some(vec![]))
        .await
        .unwrap();
}

#[tokio::test]
async fn finished_run_with_structured_error_is_still_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workflow_runs/run-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "has_remaining_interactive_tasks": false,
            "outcome": false,
            "error": {"type": "task_failed", "message": "document expired"},
            "config": []
        })))
        .mount(&server)
        .await;

    let run = engine(&server, None).fetch_run().await.unwrap();

    assert_eq!(run.outcome_step(), Outcome::Reject);
    assert_eq!(run.error.unwrap()["type"], "task_failed");
}

#[tokio::test]
async fn server_error_is_formatted_into_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workflow_runs/run-123"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"type": "authorization_error", "message": "Invalid token"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = engine(&server, Some("expired")).fetch_run().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    match err {
        WorkflowRequestError::Api {
            status,
            message,
            payload,
        } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid token");
            assert_eq!(payload.unwrap()["error"]["type"], "authorization_error");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_submission_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workflow_runs/run-123/complete"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .expect(1)
        .mount(&server)
        .await;

    let err = engine(&server, None)
        .submit_task_completion("task-abc", &TaskPayload::empty())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WorkflowRequestError::Api { status: 503, ref message, payload: None } if message == "try later"
    ));
}

#[tokio::test]
async fn undecodable_body_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workflow_runs/run-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"outcome": true})))
        .mount(&server)
        .await;

    let err = engine(&server, None).fetch_run().await.unwrap_err();
    assert!(matches!(err, WorkflowRequestError::MalformedResponse(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let credentials = EngineCredentials::builder()
        .workflow_service_url("http://127.0.0.1:1")
        .workflow_run_id("run-123")
        .build();

    let err = WorkflowEngine::new(credentials).fetch_run().await.unwrap_err();

    assert!(err.is_transport());
    let serialized = serde_json::to_value(&err).unwrap();
    assert_eq!(serialized["type"], "Transport");
}

#[test]
fn debug_output_redacts_token() {
    let credentials = EngineCredentials::builder()
        .workflow_service_url("https://workflow.example.com")
        .workflow_run_id("run-123")
        .token("super-secret")
        .build();
    let engine = WorkflowEngine::builder().credentials(credentials).build();

    let printed = format!("{engine:?}");
    assert!(!printed.contains("super-secret"));
    assert!(printed.contains("run-123"));
}

#[cfg(feature = "leaky-bucket")]
#[tokio::test]
async fn rate_limited_request_is_sent_once() {
    use leaky_bucket::RateLimiter;
    use std::{sync::Arc, time::Duration};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workflow_runs/run-123"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let limiter = RateLimiter::builder()
        .initial(0)
        .max(1)
        .refill(1)
        .interval(Duration::from_millis(20))
        .build();
    let credentials = EngineCredentials::builder()
        .workflow_service_url(server.uri())
        .workflow_run_id("run-123")
        .build();
    let engine = WorkflowEngine::builder()
        .credentials(credentials)
        .leaky_bucket(Arc::new(limiter))
        .build();

    let err = engine.fetch_run().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}
