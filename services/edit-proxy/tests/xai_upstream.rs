use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use edit_proxy::provider::{MediaApi, UpstreamReply};
use edit_proxy::provider_xai::XaiMediaApi;
use edit_proxy::types::{ResolvedVideo, VideoProgress};
use serde_json::{json, Value};

const KEY: &str = "test-key";

type Seen = Arc<Mutex<Vec<Value>>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {KEY}"))
        .unwrap_or(false)
}

async fn images_edits(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": { "message": "bad key" } }))).into_response();
    }
    seen.lock().unwrap().push(body);
    Json(json!({ "data": [{ "url": "https://x/edited.png" }] })).into_response()
}

async fn videos_edits(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    seen.lock().unwrap().push(body);
    Json(json!({ "id": "job123" })).into_response()
}

async fn videos_status(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id.as_str() {
        "pending" => StatusCode::ACCEPTED.into_response(),
        "bad" => (StatusCode::BAD_REQUEST, Json(json!({ "error": { "message": "unknown request" } })))
            .into_response(),
        "html" => (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::ACCEPTED.into_response()
        }
        other => Json(json!({ "video": { "url": format!("https://x/{other}.mp4"), "duration": 5.2 } }))
            .into_response(),
    }
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1")
}

async fn fake_upstream() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route("/v1/images/edits", post(images_edits))
        .route("/v1/videos/edits", post(videos_edits))
        .route("/v1/videos/:id", get(videos_status))
        .with_state(seen.clone());
    (spawn(router).await, seen)
}

fn api(base_url: &str, key: &str, timeout: Duration) -> XaiMediaApi {
    XaiMediaApi::new(base_url, key, "grok-imagine-image", "grok-imagine-video", timeout).unwrap()
}

#[tokio::test]
async fn image_edit_sends_model_payload_with_bearer() {
    let (base, seen) = fake_upstream().await;
    let api = api(&base, KEY, Duration::from_secs(5));

    let reply = api.edit_image("add snow", "https://x/in.png").await.unwrap();

    match reply {
        UpstreamReply::Ready(body) => assert_eq!(body.first_url(), Some("https://x/edited.png")),
        other => panic!("unexpected reply: {other:?}"),
    }
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        [json!({
            "model": "grok-imagine-image",
            "prompt": "add snow",
            "image": { "url": "https://x/in.png", "type": "image_url" }
        })]
    );
}

#[tokio::test]
async fn video_edit_returns_upstream_id() {
    let (base, seen) = fake_upstream().await;
    let api = api(&format!("{base}/"), KEY, Duration::from_secs(5));

    let reply = api.edit_video("make it night", "https://x/in.mp4").await.unwrap();

    match reply {
        UpstreamReply::Ready(body) => assert_eq!(body.request_id(), Some("job123")),
        other => panic!("unexpected reply: {other:?}"),
    }
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        [json!({ "model": "grok-imagine-video", "prompt": "make it night", "video_url": "https://x/in.mp4" })]
    );
}

#[tokio::test]
async fn status_query_maps_202_to_pending_and_200_to_done() {
    let (base, _) = fake_upstream().await;
    let api = api(&base, KEY, Duration::from_secs(5));

    assert!(matches!(
        api.video_status("pending").await.unwrap(),
        UpstreamReply::Ready(VideoProgress::Pending)
    ));

    match api.video_status("job123").await.unwrap() {
        UpstreamReply::Ready(VideoProgress::Done(body)) => assert_eq!(
            body.resolved(),
            Some(ResolvedVideo { url: "https://x/job123.mp4".to_string(), duration: Some(5.2) })
        ),
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[tokio::test]
async fn status_id_is_sent_as_one_path_segment() {
    let (base, _) = fake_upstream().await;
    let api = api(&base, KEY, Duration::from_secs(5));

    match api.video_status("a/b").await.unwrap() {
        UpstreamReply::Ready(VideoProgress::Done(body)) => {
            assert_eq!(body.resolved().unwrap().url, "https://x/a/b.mp4")
        }
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[tokio::test]
async fn dot_segment_ids_are_refused_before_sending() {
    let (base, _) = fake_upstream().await;
    let api = api(&base, KEY, Duration::from_secs(5));

    assert!(api.video_status("..").await.is_err());
    assert!(api.video_status(".").await.is_err());
}

#[tokio::test]
async fn upstream_failures_carry_status_and_message() {
    let (base, _) = fake_upstream().await;
    let api = api(&base, KEY, Duration::from_secs(5));

    match api.video_status("bad").await.unwrap() {
        UpstreamReply::Failed { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("unknown request"));
        }
        other => panic!("unexpected reply: {other:?}"),
    }

    match api.video_status("html").await.unwrap() {
        UpstreamReply::Failed { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, None);
        }
        other => panic!("unexpected reply: {other:?}"),
    }

    let wrong_key = self::api(&base, "wrong", Duration::from_secs(5));
    match wrong_key.edit_image("p", "i").await.unwrap() {
        UpstreamReply::Failed { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message.as_deref(), Some("bad key"));
        }
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_success_body_is_a_fault() {
    let router = Router::new().route("/v1/images/edits", post(|| async { "definitely not json" }));
    let base = spawn(router).await;
    let api = api(&base, KEY, Duration::from_secs(5));

    assert!(api.edit_image("p", "i").await.is_err());
}

#[tokio::test]
async fn unreachable_upstream_is_a_fault() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = api(&format!("http://{addr}/v1"), KEY, Duration::from_secs(5));

    assert!(api.edit_video("p", "v").await.is_err());
}

#[tokio::test]
async fn stalled_upstream_hits_the_request_timeout() {
    let (base, _) = fake_upstream().await;
    let api = api(&base, KEY, Duration::from_millis(200));

    let started = std::time::Instant::now();
    assert!(api.video_status("slow").await.is_err());
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn info_reports_trimmed_base_url() {
    let api = api("https://api.example/v1/", KEY, Duration::from_secs(1));
    let info = api.info();
    assert_eq!(info.name, "xai");
    assert_eq!(info.base_url, "https://api.example/v1");
}
