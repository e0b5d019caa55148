use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use ebp_core::{
    BatchOrchestrator, Document, HttpScoringClient, MediaKind, ScoringAuthority, ScoringError,
    Upload,
};

/// What the test server saw in one upload.
#[derive(Debug, Clone)]
struct Received {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: usize,
}

type Seen = Arc<Mutex<Vec<Received>>>;

fn scores(empirical: serde_json::Value) -> serde_json::Value {
    json!({
        "Use of Empirical Research": {"score": empirical, "justification": "Cites studies."},
        "Formal Evidence-Gathering Process": {"score": 2, "justification": "Hearings."},
        "Transparency and Accessibility": {"score": 1, "justification": "Some."},
        "Expert and Stakeholder Input": {"score": 2, "justification": "Panel."},
        "Evaluation and Iteration": {"score": 3, "justification": "Annual review."}
    })
}

/// Answers according to the uploaded file name.
async fn score_handler(State(seen): State<Seen>, mut multipart: Multipart) -> Response {
    let mut file_name = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let received = Received {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            bytes: 0,
        };
        let bytes = field.bytes().await.unwrap();
        file_name = received.file_name.clone().unwrap_or_default();
        seen.lock().unwrap().push(Received {
            bytes: bytes.len(),
            ..received
        });
    }

    match file_name.as_str() {
        "limited.txt" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"detail": "Rate limit exceeded. Please wait 60 seconds."})),
        )
            .into_response(),
        "broken.txt" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Model crashed"})),
        )
            .into_response(),
        "garbage.txt" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "partial.txt" => {
            let mut body = scores(json!(1));
            body.as_object_mut()
                .unwrap()
                .remove("Evaluation and Iteration");
            Json(json!({"filename": file_name, "scores": body})).into_response()
        }
        "high.txt" => {
            Json(json!({"filename": file_name, "scores": scores(json!(4))})).into_response()
        }
        "na.txt" => {
            Json(json!({"filename": file_name, "scores": scores(json!("NA"))})).into_response()
        }
        _ => Json(json!({"filename": file_name, "scores": scores(json!(3))})).into_response(),
    }
}

async fn spawn_server() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/score", post(score_handler))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/score", addr), seen)
}

fn client(endpoint: &str) -> HttpScoringClient {
    HttpScoringClient::new(endpoint, Duration::from_secs(10)).unwrap()
}

fn text_doc(name: &str) -> Document {
    Document::new(name, MediaKind::PlainText, b"Policy text.".to_vec())
}

#[tokio::test]
async fn test_scores_document() {
    let (endpoint, seen) = spawn_server().await;

    let set = client(&endpoint).score(&text_doc("ok.txt")).await.unwrap();

    assert_eq!(set.values(), [3, 2, 1, 2, 3]);
    assert_eq!(set.total(), 11);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].field, "file");
    assert_eq!(seen[0].file_name.as_deref(), Some("ok.txt"));
    assert_eq!(seen[0].content_type.as_deref(), Some("text/plain"));
    assert_eq!(seen[0].bytes, "Policy text.".len());
}

#[tokio::test]
async fn test_sends_declared_media_type() {
    let (endpoint, seen) = spawn_server().await;
    let doc = Document::new("memo.pdf", MediaKind::Pdf, b"%PDF-1.5".to_vec());

    client(&endpoint).score(&doc).await.unwrap();

    assert_eq!(
        seen.lock().unwrap()[0].content_type.as_deref(),
        Some("application/pdf")
    );
}

#[tokio::test]
async fn test_rate_limit_carries_detail() {
    let (endpoint, _) = spawn_server().await;

    let err = client(&endpoint)
        .score(&text_doc("limited.txt"))
        .await
        .unwrap_err();

    match err {
        ScoringError::RateLimited { detail } => assert!(detail.contains("60 seconds")),
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_rejected() {
    let (endpoint, _) = spawn_server().await;

    let err = client(&endpoint)
        .score(&text_doc("broken.txt"))
        .await
        .unwrap_err();

    match err {
        ScoringError::Rejected { status, detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail, "Model crashed");
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_bodies_fail() {
    let (endpoint, _) = spawn_server().await;
    let client = client(&endpoint);

    assert!(matches!(
        client.score(&text_doc("partial.txt")).await,
        Err(ScoringError::MissingDimension("Evaluation & Iteration"))
    ));
    assert!(matches!(
        client.score(&text_doc("high.txt")).await,
        Err(ScoringError::InvalidScore { .. })
    ));
    assert!(matches!(
        client.score(&text_doc("na.txt")).await,
        Err(ScoringError::InvalidScore { .. })
    ));
    assert!(matches!(
        client.score(&text_doc("garbage.txt")).await,
        Err(ScoringError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}/score", addr))
        .score(&text_doc("ok.txt"))
        .await
        .unwrap_err();

    assert!(matches!(err, ScoringError::Unreachable(_)));
}

#[tokio::test]
async fn test_batch_against_http_authority() {
    let (endpoint, seen) = spawn_server().await;
    let orchestrator = BatchOrchestrator::new(Arc::new(client(&endpoint)));

    let state = orchestrator
        .submit(vec![
            Upload::new("first.txt", None, b"Randomized study data.".to_vec()),
            Upload::new("limited.txt", None, b"Second.".to_vec()),
            Upload::new("third.txt", None, b"Third.".to_vec()),
        ])
        .await
        .unwrap();

    let names: Vec<&str> = state.results.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["first.txt", "third.txt"]);
    assert_eq!(state.focused, Some(0));
    assert_eq!(state.errors.len(), 1);
    assert_eq!(state.errors[0].file_name, "limited.txt");
    assert!(state.errors[0].reason.contains("rate limit"));

    // One request per document
    assert_eq!(seen.lock().unwrap().len(), 3);
}
