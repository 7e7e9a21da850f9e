//! HTTP routes
//!
//! | Route          | Method | Behaviour                                        |
//! |----------------|--------|--------------------------------------------------|
//! | `/`            | GET    | upload form                                      |
//! | `/isup`        | GET    | liveness, always `True`                          |
//! | `/ready`       | GET    | readiness, 503 until the model is loaded         |
//! | `/card/{name}` | GET    | card detail, or the unknown-card page            |
//! | `/analyze`     | POST   | classify the uploaded `file`, redirect to card   |
//! | `/feedback`    | GET    | append `name,1` / `name,0`, redirect home        |
//!
//! Every route except the two probes is rejected with 503 while the service
//! is not ready.

use crate::lifecycle::{ServiceContext, SharedLifecycle};
use crate::pages::{self, NOT_KNOWN};
use bytes::BufMut;
use futures_util::TryStreamExt;
use pokedex_runtime::{FeedbackError, Verdict};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info};
use warp::http::{StatusCode, Uri};
use warp::multipart::FormData;
use warp::{Filter, Rejection, Reply};

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    pub ans: String,
    pub name: String,
}

// =============================================================================
// Rejections
// =============================================================================

/// The service context is not installed yet
#[derive(Debug)]
pub struct NotReady;

impl warp::reject::Reject for NotReady {}

/// The multipart body could not be read or has no `file` field
#[derive(Debug)]
pub struct BadUpload(pub String);

impl warp::reject::Reject for BadUpload {}

/// The feedback name cannot be stored as one log line
#[derive(Debug)]
pub struct BadFeedback(pub String);

impl warp::reject::Reject for BadFeedback {}

/// A handler failed after the request was accepted
#[derive(Debug)]
pub struct HandlerFailure(pub String);

impl warp::reject::Reject for HandlerFailure {}

// =============================================================================
// Routes
// =============================================================================

/// Full application: routes, rejection mapping and CORS
pub fn app(
    lifecycle: SharedLifecycle,
    max_upload_bytes: u64,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["x-requested-with", "content-type"]);

    routes(lifecycle, max_upload_bytes)
        .recover(handle_rejection)
        .with(cors)
}

/// Build the route tree
pub fn routes(
    lifecycle: SharedLifecycle,
    max_upload_bytes: u64,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let home = warp::path::end()
        .and(warp::get())
        .and(with_context(lifecycle.clone()))
        .map(|_ctx: Arc<ServiceContext>| warp::reply::html(pages::home()));

    let isup = warp::path("isup")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("True", StatusCode::OK));

    let ready = warp::path("ready")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_lifecycle(lifecycle.clone()))
        .map(handle_ready);

    let card = warp::path("card")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(lifecycle.clone()))
        .map(handle_card);

    let analyze = warp::path("analyze")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::multipart::form().max_length(max_upload_bytes))
        .and(with_context(lifecycle.clone()))
        .and_then(handle_analyze);

    let feedback = warp::path("feedback")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<FeedbackQuery>())
        .and(with_context(lifecycle))
        .and_then(handle_feedback);

    home.or(isup)
        .or(ready)
        .or(card)
        .or(analyze)
        .or(feedback)
}

// =============================================================================
// Filters
// =============================================================================

fn with_lifecycle(
    lifecycle: SharedLifecycle,
) -> impl Filter<Extract = (SharedLifecycle,), Error = Infallible> + Clone {
    warp::any().map(move || lifecycle.clone())
}

/// Pass the service context on, or reject with [`NotReady`]
fn with_context(
    lifecycle: SharedLifecycle,
) -> impl Filter<Extract = (Arc<ServiceContext>,), Error = Rejection> + Clone {
    warp::any().and_then(move || {
        let lifecycle = lifecycle.clone();
        async move { lifecycle.context().ok_or_else(|| warp::reject::custom(NotReady)) }
    })
}

// =============================================================================
// Handlers
// =============================================================================

fn handle_ready(lifecycle: SharedLifecycle) -> warp::reply::Response {
    let uptime = lifecycle.start_time.elapsed().as_secs_f64();
    match lifecycle.context() {
        Some(ctx) => {
            let response = serde_json::json!({
                "status": "ready",
                "model": ctx.predictor.name(),
                "cards": ctx.catalog.len(),
                "uptime_seconds": uptime,
                "version": env!("CARGO_PKG_VERSION"),
            });
            warp::reply::with_status(warp::reply::json(&response), StatusCode::OK).into_response()
        }
        None => {
            let response = serde_json::json!({
                "status": "not_ready",
                "uptime_seconds": uptime,
            });
            warp::reply::with_status(
                warp::reply::json(&response),
                StatusCode::SERVICE_UNAVAILABLE,
            )
            .into_response()
        }
    }
}

fn handle_card(name: String, ctx: Arc<ServiceContext>) -> warp::reply::Html<String> {
    // warp hands over the raw, still percent-encoded segment
    let name = pages::decode_component(&name);
    if name == NOT_KNOWN {
        return warp::reply::html(pages::card_not_known());
    }
    warp::reply::html(pages::card(ctx.catalog.by_slug(&name)))
}

async fn handle_analyze(
    form: FormData,
    ctx: Arc<ServiceContext>,
) -> Result<warp::reply::Response, Rejection> {
    let image = read_file_field(form).await?;
    info!("Got image ({} bytes), making prediction", image.len());

    let predictor = ctx.predictor.clone();
    let prediction = tokio::task::spawn_blocking(move || predictor.predict(&image))
        .await
        .map_err(|e| failure(format!("prediction task failed: {}", e)))?
        .map_err(|e| failure(e.to_string()))?;

    let target = match ctx.catalog.get(&prediction.label) {
        Some(card) => {
            info!(
                label = %prediction.label,
                confidence = prediction.confidence(),
                "Recognised {}",
                card.name
            );
            format!("/card/{}", pages::encode_component(&card.sname))
        }
        None => {
            info!(label = %prediction.label, "Prediction has no catalog entry");
            format!("/card/{}", NOT_KNOWN)
        }
    };
    see_other(&target)
}

async fn handle_feedback(
    query: FeedbackQuery,
    ctx: Arc<ServiceContext>,
) -> Result<warp::reply::Response, Rejection> {
    if let Some(verdict) = Verdict::parse(&query.ans) {
        ctx.feedback
            .record(&query.name, verdict)
            .await
            .map_err(|e| match e {
                FeedbackError::InvalidName(_) => {
                    warp::reject::custom(BadFeedback(e.to_string()))
                }
                FeedbackError::Io { .. } => failure(e.to_string()),
            })?;
    }
    see_other("/")
}

// =============================================================================
// Helpers
// =============================================================================

/// Read the `file` part. Parts have to be consumed in order: a part's body
/// is only readable until the next part is requested.
async fn read_file_field(mut form: FormData) -> Result<Vec<u8>, Rejection> {
    while let Some(part) = form.try_next().await.map_err(bad_upload)? {
        if part.name() != "file" {
            continue;
        }
        return part
            .stream()
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.put(chunk);
                Ok(acc)
            })
            .await
            .map_err(bad_upload);
    }
    Err(warp::reject::custom(BadUpload(
        "missing `file` field".to_string(),
    )))
}

fn bad_upload(err: warp::Error) -> Rejection {
    warp::reject::custom(BadUpload(err.to_string()))
}

fn see_other(target: &str) -> Result<warp::reply::Response, Rejection> {
    let uri: Uri = target
        .parse()
        .map_err(|e| failure(format!("invalid redirect target '{}': {}", target, e)))?;
    Ok(warp::redirect::see_other(uri).into_response())
}

fn failure(message: String) -> Rejection {
    warp::reject::custom(HandlerFailure(message))
}

/// Map rejections to JSON error responses
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message): (StatusCode, String) = if err.find::<NotReady>().is_some() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Service is starting up".into(),
        )
    } else if let Some(HandlerFailure(reason)) = err.find::<HandlerFailure>() {
        error!("Request failed: {}", reason);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".into(),
        )
    } else if let Some(BadUpload(reason)) = err.find::<BadUpload>() {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid upload: {}", reason),
        )
    } else if let Some(BadFeedback(reason)) = err.find::<BadFeedback>() {
        (StatusCode::BAD_REQUEST, reason.clone())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (
            StatusCode::BAD_REQUEST,
            "Invalid query parameters".into(),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Request payload too large".into(),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            "Content-Length header required".into(),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported media type".into(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".into(),
        )
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".into())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".into(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message
        })),
        code,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Lifecycle;
    use pokedex_runtime::{CardCatalog, FeedbackLog, ModelError, Prediction, Predictor};

    const CARDS: &str = r#"{
        "025_pikachu": {"name": "Pikachu", "sname": "pikachu", "hp": 60},
        "004_charmander": {"name": "Charmander", "sname": "charmander"},
        "122_mr_mime": {"name": "Mr. Mime", "sname": "mr mime"},
        "669_flabebe": {"name": "Flabébé", "sname": "flabébé"},
        "notknown": {"name": "Should Not Appear", "sname": "ghost"}
    }"#;

    const BOUNDARY: &str = "pokedex-test-boundary";

    /// Always predicts the same label
    struct FixedPredictor(&'static str);

    impl Predictor for FixedPredictor {
        fn predict(&self, _image: &[u8]) -> Result<Prediction, ModelError> {
            Ok(Prediction {
                label: self.0.to_string(),
                class_index: 0,
                scores: vec![1.0],
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Fails like an undecodable upload
    struct BrokenPredictor;

    impl Predictor for BrokenPredictor {
        fn predict(&self, _image: &[u8]) -> Result<Prediction, ModelError> {
            Err(ModelError::Decode("unsupported image format".into()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn context(predictor: Arc<dyn Predictor>, dir: &tempfile::TempDir) -> ServiceContext {
        ServiceContext {
            predictor,
            catalog: CardCatalog::from_json(CARDS).unwrap(),
            feedback: FeedbackLog::new(dir.path().join("feedback.csv")),
        }
    }

    fn ready_app(
        predictor: Arc<dyn Predictor>,
        dir: &tempfile::TempDir,
    ) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        app(Lifecycle::ready(context(predictor, dir)), 1024 * 1024)
    }

    /// A text part followed by `field` holding `data`
    fn multipart_body(field: &str, data: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             taken at the card fair\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"card.png\"\r\n\
             Content-Type: image/png\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn analyze_request(field: &str) -> warp::test::RequestBuilder {
        warp::test::request()
            .method("POST")
            .path("/analyze")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(multipart_body(field, b"\x89PNG fake image bytes"))
    }

    fn location(resp: &warp::http::Response<bytes::Bytes>) -> &str {
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    fn body_text(resp: &warp::http::Response<bytes::Bytes>) -> String {
        String::from_utf8_lossy(resp.body()).to_string()
    }

    #[tokio::test]
    async fn test_isup_when_ready() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request().path("/isup").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body().as_ref(), b"True");
        let content_type = resp.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn test_isup_when_not_ready() {
        let routes = app(Lifecycle::new(), 1024);

        let resp = warp::test::request().path("/isup").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body().as_ref(), b"True");
    }

    #[tokio::test]
    async fn test_routes_rejected_until_ready() {
        let routes = app(Lifecycle::new(), 1024);

        for path in ["/", "/card/pikachu", "/feedback?ans=correct&name=x"] {
            let resp = warp::test::request().path(path).reply(&routes).await;
            assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE, "{}", path);
        }

        let resp = warp::test::request().path("/ready").reply(&routes).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["status"], "not_ready");
    }

    #[tokio::test]
    async fn test_ready_reports_context() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request().path("/ready").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["model"], "fixed");
        assert_eq!(body["cards"], 5);
    }

    #[tokio::test]
    async fn test_becomes_ready_after_mark_ready() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = Lifecycle::new();
        let routes = app(lifecycle.clone(), 1024);

        let resp = warp::test::request().path("/").reply(&routes).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        lifecycle
            .mark_ready(context(Arc::new(FixedPredictor("x")), &dir))
            .unwrap();

        let resp = warp::test::request().path("/").reply(&routes).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_home_page() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request().path("/").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(&resp).contains("action=\"/analyze\""));
    }

    #[tokio::test]
    async fn test_card_not_known_skips_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request()
            .path("/card/notknown")
            .reply(&routes)
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(&resp);
        assert!(body.contains("We could not recognise this card."));
        assert!(!body.contains("Should Not Appear"));
    }

    #[tokio::test]
    async fn test_card_by_label_and_sname() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request()
            .path("/card/025_pikachu")
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(&resp).contains("<h1>Pikachu</h1>"));

        let resp = warp::test::request()
            .path("/card/charmander")
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(&resp).contains("<h1>Charmander</h1>"));
    }

    #[tokio::test]
    async fn test_unknown_card_renders_empty_page() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request()
            .path("/card/missingno")
            .reply(&routes)
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(&resp).contains("No card information available."));
    }

    #[tokio::test]
    async fn test_analyze_redirects_to_card() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = analyze_request("file").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/card/pikachu");
    }

    #[tokio::test]
    async fn test_analyze_unknown_label_redirects_to_notknown() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("150_mewtwo")), &dir);

        let resp = analyze_request("file").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/card/notknown");
    }

    #[tokio::test]
    async fn test_analyze_without_file_field() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = analyze_request("picture").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["error"], "Invalid upload: missing `file` field");
    }

    #[tokio::test]
    async fn test_analyze_reads_file_after_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("004_charmander")), &dir);

        let resp = analyze_request("file").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{}", body_text(&resp));
        assert_eq!(location(&resp), "/card/charmander");
    }

    #[tokio::test]
    async fn test_analyze_redirect_renders_card() {
        let cases = [
            ("025_pikachu", "/card/pikachu", "<h1>Pikachu</h1>"),
            ("122_mr_mime", "/card/mr%20mime", "<h1>Mr. Mime</h1>"),
            ("669_flabebe", "/card/flab%C3%A9b%C3%A9", "<h1>Flabébé</h1>"),
        ];

        for (label, target, heading) in cases {
            let dir = tempfile::tempdir().unwrap();
            let routes = ready_app(Arc::new(FixedPredictor(label)), &dir);

            let resp = analyze_request("file").reply(&routes).await;
            assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{}", label);
            assert_eq!(location(&resp), target);

            let page = warp::test::request()
                .path(location(&resp))
                .reply(&routes)
                .await;
            assert_eq!(page.status(), StatusCode::OK);
            let html = body_text(&page);
            assert!(html.contains(heading), "{}: {}", label, html);
            assert!(!html.contains("No card information available."));
        }
    }

    #[tokio::test]
    async fn test_card_by_encoded_slug() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request()
            .path("/card/mr%20mime")
            .reply(&routes)
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(&resp).contains("<h1>Mr. Mime</h1>"));
    }

    #[tokio::test]
    async fn test_analyze_upload_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = Lifecycle::ready(context(Arc::new(FixedPredictor("025_pikachu")), &dir));
        let routes = app(lifecycle, 16);

        let resp = analyze_request("file").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_analyze_prediction_failure_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(BrokenPredictor), &dir);

        let resp = analyze_request("file").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_analyze_requires_post() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request().path("/analyze").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_feedback_correct_and_wrong() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request()
            .path("/feedback?ans=correct&name=025_pikachu")
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");

        let resp = warp::test::request()
            .path("/feedback?ans=wrong&name=004_charmander")
            .reply(&routes)
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");

        let log = std::fs::read_to_string(dir.path().join("feedback.csv")).unwrap();
        assert_eq!(log, "025_pikachu,1\n004_charmander,0\n");
    }

    #[tokio::test]
    async fn test_feedback_other_answer_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request()
            .path("/feedback?ans=maybe&name=025_pikachu")
            .reply(&routes)
            .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");
        assert!(!dir.path().join("feedback.csv").exists());
    }

    #[tokio::test]
    async fn test_feedback_refuses_names_that_split_lines() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request()
            .path("/feedback?ans=correct&name=pikachu%0Amewtwo%2C1")
            .reply(&routes)
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("feedback.csv").exists());
    }

    #[tokio::test]
    async fn test_feedback_missing_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request()
            .path("/feedback?ans=correct")
            .reply(&routes)
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request().path("/pokemon").reply(&routes).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let dir = tempfile::tempdir().unwrap();
        let routes = ready_app(Arc::new(FixedPredictor("025_pikachu")), &dir);

        let resp = warp::test::request()
            .path("/isup")
            .header("origin", "https://cards.example.com")
            .reply(&routes)
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["access-control-allow-origin"],
            "https://cards.example.com"
        );
    }
}
