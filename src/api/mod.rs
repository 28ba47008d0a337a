use std::collections::VecDeque;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::{ConfigError, ServerConfig};
use crate::core::{
    Assessment, CalculationCategory, GREETING, HistoryEntry, ParameterRecord, ResultRecord,
    compute_on_worker, process_on_worker, render_answer, validate_params,
};

#[derive(Debug)]
struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl HistoryLog {
    fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(1024)),
            limit,
        }
    }

    fn push(&mut self, entry: HistoryEntry) {
        if self.limit == 0 {
            return;
        }
        while self.entries.len() >= self.limit {
            if self.entries.pop_front().is_none() {
                break;
            }
        }
        self.entries.push_back(entry);
    }

    fn clear(&mut self) -> usize {
        let cleared = self.entries.len();
        self.entries.clear();
        cleared
    }
}

#[derive(Clone)]
pub struct AppState {
    history: Arc<Mutex<HistoryLog>>,
}

impl AppState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            history: Arc::new(Mutex::new(HistoryLog::new(history_limit))),
        }
    }

    async fn record(
        &self,
        category: CalculationCategory,
        params: &ParameterRecord,
        result: &ResultRecord,
    ) {
        let entry = HistoryEntry::record(category, params, result, Utc::now());
        self.history.lock().await.push(entry);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextPayload {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputePayload {
    category: CalculationCategory,
    #[serde(default)]
    params: ParameterRecord,
    #[serde(default)]
    save: bool,
}

#[derive(Debug, Deserialize)]
struct ShareQuery {
    index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AskResponse {
    #[serde(flatten)]
    assessment: Assessment,
    result: ResultRecord,
    answer: String,
}

#[derive(Debug, Serialize)]
struct CategoryInfo {
    category: CalculationCategory,
    title: &'static str,
}

#[derive(Debug, Serialize)]
struct GreetingResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ClearedResponse {
    cleared: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/process",
            get(process_get_handler).post(process_post_handler),
        )
        .route("/api/compute", axum::routing::post(compute_handler))
        .route("/api/ask", axum::routing::post(ask_handler))
        .route(
            "/api/history",
            get(history_handler).delete(clear_history_handler),
        )
        .route("/api/history/share", get(share_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/greeting", get(greeting_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(config: &ServerConfig) -> Result<(), ServeError> {
    let addr = config.socket_addr()?;
    let app = router(AppState::new(config.history_limit));

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, history_limit = config.history_limit, "finance assistant API listening");

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

async fn process_get_handler(payload: Result<Query<TextPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => process_handler_impl(payload).await,
        Err(rejection) => error_response(rejection.status(), &rejection.body_text()),
    }
}

async fn process_post_handler(payload: Result<Json<TextPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => process_handler_impl(payload).await,
        Err(rejection) => error_response(rejection.status(), &rejection.body_text()),
    }
}

async fn process_handler_impl(payload: TextPayload) -> Response {
    let text = match validate_text(payload) {
        Ok(text) => text,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    json_response(StatusCode::OK, process_on_worker(text).await)
}

async fn compute_handler(
    State(state): State<AppState>,
    payload: Result<Json<ComputePayload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return error_response(rejection.status(), &rejection.body_text()),
    };
    if let Err(msg) = validate_params(&payload.params) {
        return error_response(StatusCode::BAD_REQUEST, &msg);
    }

    let result = match compute_on_worker(payload.category, payload.params.clone()).await {
        Ok(result) => result,
        Err(err) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    };
    if payload.save {
        state
            .record(payload.category, &payload.params, &result)
            .await;
    }
    json_response(StatusCode::OK, result)
}

async fn ask_handler(
    State(state): State<AppState>,
    payload: Result<Json<TextPayload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return error_response(rejection.status(), &rejection.body_text()),
    };
    let text = match validate_text(payload) {
        Ok(text) => text,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let assessment = process_on_worker(text).await;
    if let Err(msg) = validate_params(&assessment.params) {
        return error_response(StatusCode::BAD_REQUEST, &msg);
    }
    let result = match compute_on_worker(assessment.category, assessment.params.clone()).await {
        Ok(result) => result,
        Err(err) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    };
    let answer = if assessment.success {
        state
            .record(assessment.category, &assessment.params, &result)
            .await;
        render_answer(&assessment, &result)
    } else {
        assessment.explanation.clone()
    };

    json_response(
        StatusCode::OK,
        AskResponse {
            assessment,
            result,
            answer,
        },
    )
}

async fn history_handler(State(state): State<AppState>) -> Response {
    let history = state.history.lock().await;
    let entries: Vec<&HistoryEntry> = history.entries.iter().collect();
    json_response(StatusCode::OK, entries)
}

async fn clear_history_handler(State(state): State<AppState>) -> Response {
    let cleared = state.history.lock().await.clear();
    json_response(StatusCode::OK, ClearedResponse { cleared })
}

async fn share_handler(
    State(state): State<AppState>,
    query: Result<Query<ShareQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return error_response(rejection.status(), &rejection.body_text()),
    };
    let history = state.history.lock().await;
    match history.entries.get(query.index) {
        Some(entry) => with_cache_control((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            entry.share_text(),
        )),
        None => error_response(
            StatusCode::NOT_FOUND,
            &format!("no history entry at index {}", query.index),
        ),
    }
}

async fn categories_handler() -> Response {
    let categories: Vec<CategoryInfo> = CalculationCategory::ALL
        .into_iter()
        .map(|category| CategoryInfo {
            category,
            title: category.title(),
        })
        .collect();
    json_response(StatusCode::OK, categories)
}

async fn greeting_handler() -> Response {
    json_response(StatusCode::OK, GreetingResponse { message: GREETING })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn validate_text(payload: TextPayload) -> Result<String, String> {
    let text = payload.text.unwrap_or_default();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("text must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(3))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        (
            status,
            String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    fn parse(body: &str) -> Value {
        serde_json::from_str(body).expect("json body")
    }

    #[test]
    fn validate_text_rejects_blank_input() {
        let err = validate_text(TextPayload {
            text: Some("   ".to_string()),
        })
        .expect_err("must reject blank text");
        assert!(err.contains("text"));
        assert!(validate_text(TextPayload::default()).is_err());
    }

    #[test]
    fn validate_text_trims() {
        let text = validate_text(TextPayload {
            text: Some("  emi for loan 5000 ".to_string()),
        })
        .expect("valid text");
        assert_eq!(text, "emi for loan 5000");
    }

    #[test]
    fn compute_payload_accepts_partial_params_and_lowercase_category() {
        let payload: ComputePayload = serde_json::from_str(
            r#"{"category":"fd","params":{"principal":100000,"rate":6,"years":5}}"#,
        )
        .expect("valid payload");
        assert_eq!(payload.category, CalculationCategory::Fd);
        assert_eq!(payload.params.principal, 100_000.0);
        assert_eq!(payload.params.corpus, None);
        assert!(!payload.save);
    }

    #[test]
    fn history_log_evicts_oldest() {
        let mut log = HistoryLog::new(2);
        for years in 1..=3 {
            let params = ParameterRecord {
                years,
                ..ParameterRecord::default()
            };
            log.push(HistoryEntry::record(
                CalculationCategory::Sip,
                &params,
                &ResultRecord::default(),
                Utc::now(),
            ));
        }
        assert_eq!(log.entries.len(), 2);
        assert!(log.entries[0].params.contains("Years: 2"));
        assert_eq!(log.clear(), 2);
        assert!(log.entries.is_empty());
    }

    #[test]
    fn history_log_with_zero_limit_keeps_nothing() {
        let mut log = HistoryLog::new(0);
        log.push(HistoryEntry::record(
            CalculationCategory::Fd,
            &ParameterRecord::default(),
            &ResultRecord::default(),
            Utc::now(),
        ));
        assert!(log.entries.is_empty());
    }

    #[tokio::test]
    async fn zero_limit_state_still_answers_ask() {
        let app = router(AppState::new(0));
        let (status, _) = send(
            &app,
            post_json("/api/ask", json!({"text": "lumpsum 10000 for 3 years at 9%"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, history) = send(&app, get("/api/history")).await;
        assert_eq!(parse(&history), json!([]));
    }

    #[tokio::test]
    async fn compute_rejects_oversized_years() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/compute",
                json!({
                    "category": "RD",
                    "params": {"monthlyContribution": 100, "rate": 7, "years": 2_000_000_000}
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(parse(&body)["error"]
            .as_str()
            .expect("error string")
            .contains("years must be <= 100"));
    }

    #[tokio::test]
    async fn ask_rejects_oversized_years() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/ask",
                json!({"text": "recurring deposit monthly 100 for 2000000000 years at 7%"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(parse(&body)["error"]
            .as_str()
            .expect("error string")
            .contains("years must be <="));

        let (_, history) = send(&app, get("/api/history")).await;
        assert_eq!(parse(&history), json!([]));
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_error_without_caching() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/compute")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("valid request");
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&header::HeaderValue::from_static("no-store"))
        );
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let value: Value = serde_json::from_slice(&bytes).expect("json body");
        assert!(value["error"].is_string());
    }

    #[tokio::test]
    async fn share_without_index_is_a_json_error() {
        let app = app();
        let (status, body) = send(&app, get("/api/history/share")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(parse(&body)["error"].is_string());
    }

    #[tokio::test]
    async fn process_returns_assessment_json() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/process",
                json!({"text": "fixed deposit 100000 at 6% for 5 years"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let value = parse(&body);
        assert_eq!(value["category"], "FD");
        assert_eq!(value["params"]["principal"], 100000.0);
        assert_eq!(value["params"]["years"], 5);
        assert_eq!(value["success"], true);
        assert!(value["explanation"]
            .as_str()
            .expect("explanation string")
            .contains("Fixed Deposit"));
    }

    #[tokio::test]
    async fn process_get_reads_query_string() {
        let app = app();
        let (status, body) = send(&app, get("/api/process?text=cagr%20100%20200%205")).await;
        assert_eq!(status, StatusCode::OK);
        let value = parse(&body);
        assert_eq!(value["category"], "CAGR");
        assert_eq!(value["params"]["beginningValue"], 100.0);
        assert_eq!(value["params"]["endingValue"], 200.0);
    }

    #[tokio::test]
    async fn process_rejects_empty_text() {
        let app = app();
        let (status, body) = send(&app, post_json("/api/process", json!({"text": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse(&body)["error"], "text must not be empty");
    }

    #[tokio::test]
    async fn compute_with_save_records_history() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/compute",
                json!({
                    "category": "SIP",
                    "params": {"monthlyContribution": 5000, "rate": 12, "years": 10},
                    "save": true
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let value = parse(&body);
        let final_amount = value["finalAmount"].as_f64().expect("number");
        assert!((final_amount - 1_161_695.38).abs() < 0.01);
        assert_eq!(value["periodicAmount"], 5000.0);

        let (_, history) = send(&app, get("/api/history")).await;
        let history = parse(&history);
        assert_eq!(history.as_array().map(Vec::len), Some(1));
        assert_eq!(history[0]["category"], "SIP");
        assert_eq!(history[0]["result"], "₹1161695.38");
    }

    #[tokio::test]
    async fn compute_without_save_leaves_history_empty() {
        let app = app();
        send(
            &app,
            post_json(
                "/api/compute",
                json!({"category": "EMI", "params": {"principal": 1000000, "rate": 8.5, "years": 20}}),
            ),
        )
        .await;
        let (_, history) = send(&app, get("/api/history")).await;
        assert_eq!(parse(&history), json!([]));
    }

    #[tokio::test]
    async fn ask_renders_answer_and_records_history() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/ask",
                json!({"text": "I want to invest 5000 monthly in a SIP for 10 years at 12%"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let value = parse(&body);
        assert_eq!(value["category"], "SIP");
        assert_eq!(value["result"]["totalContributed"], 600000.0);
        let answer = value["answer"].as_str().expect("answer string");
        assert!(answer.contains("📊 **Calculation Results:**"));
        assert!(answer.contains("• Monthly Amount: ₹5000.00"));

        let (status, share) = send(&app, get("/api/history/share?index=0")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(share.starts_with("SIP Calculation"));
        assert!(share.contains("Parameters: Monthly: ₹5000, Years: 10, Rate: 12%"));
    }

    #[tokio::test]
    async fn share_out_of_range_is_not_found() {
        let app = app();
        let (status, body) = send(&app, get("/api/history/share?index=4")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(parse(&body)["error"]
            .as_str()
            .expect("error string")
            .contains("index 4"));
    }

    #[tokio::test]
    async fn clearing_history_reports_count() {
        let app = app();
        for text in ["emi for loan 500000 for 5 years at 9%", "lumpsum 10000 for 3 years"] {
            send(&app, post_json("/api/ask", json!({ "text": text }))).await;
        }
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/history")
            .body(Body::empty())
            .expect("valid request");
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body), json!({"cleared": 2}));
    }

    #[tokio::test]
    async fn categories_lists_all_eight() {
        let app = app();
        let (_, body) = send(&app, get("/api/categories")).await;
        let value = parse(&body);
        let names: Vec<&str> = value
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|c| c["category"].as_str())
            .collect();
        assert_eq!(
            names,
            ["SIP", "SWP", "EMI", "CAGR", "LUMPSUM", "FD", "RD", "BASIC"]
        );
    }

    #[tokio::test]
    async fn responses_are_not_cached() {
        let app = app();
        let response = app
            .clone()
            .oneshot(get("/api/greeting"))
            .await
            .expect("router is infallible");
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&header::HeaderValue::from_static("no-store"))
        );
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let app = app();
        let (status, body) = send(&app, get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(parse(&body), json!({"error": "Not found"}));
    }
}
