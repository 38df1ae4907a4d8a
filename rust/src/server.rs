use anyhow::{anyhow, Context, Result};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config_store::ConfigStore;
use crate::main_ui_html::build_main_ui_html;
use crate::pyramid::{EditorSession, Note, NoteField, Tier};

pub struct AppState {
    pub config: ConfigStore,
    pub session: Mutex<EditorSession>,
    pub copy_state: Mutex<CopyState>,
    pub server_port: AtomicU16,
}

type ApiResponse = (StatusCode, Json<Value>);

pub struct CopyState {
    pub last_text: String,
    pub last_copy_time: Option<Instant>,
}

impl AppState {
    pub fn new(config: ConfigStore) -> Self {
        Self {
            config,
            session: Mutex::new(EditorSession::default()),
            copy_state: Mutex::new(CopyState {
                last_text: String::new(),
                last_copy_time: None,
            }),
            server_port: AtomicU16::new(0),
        }
    }
}

pub struct AppServer {
    port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl AppServer {
    pub fn start(state: Arc<AppState>, preferred_port: u16) -> Result<Self> {
        let listener = bind_listener(preferred_port)?;
        let port = listener
            .local_addr()
            .context("falha ao inspecionar o endereço local do servidor")?
            .port();
        listener
            .set_nonblocking(true)
            .context("falha ao configurar o listener como não bloqueante")?;

        state.server_port.store(port, Ordering::Relaxed);
        info!(port, "servidor local do editor pronto");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let thread_handle = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build();
            let Ok(runtime) = runtime else {
                return;
            };

            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::from_std(listener) {
                    Ok(listener) => listener,
                    Err(_) => return,
                };

                let app = build_router(state);
                let server = axum::serve(listener, app).with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                });
                let _ = server.await;
            });
        });

        Ok(Self {
            port,
            shutdown_tx: Some(shutdown_tx),
            thread_handle: Some(thread_handle),
        })
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Drop for AppServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Serialize)]
struct TierSnapshot {
    tier: Tier,
    label: &'static str,
    notes: Vec<Note>,
}

#[derive(Debug, Clone, Serialize)]
struct UiSnapshot {
    editing: bool,
    tiers: Vec<TierSnapshot>,
    output: String,
    confirm_remove: bool,
}

#[derive(Debug, Deserialize)]
struct LoadReq {
    html: String,
}

#[derive(Debug, Deserialize)]
struct AddNoteReq {
    tier: Tier,
}

#[derive(Debug, Deserialize)]
struct EditNoteReq {
    tier: Tier,
    index: usize,
    field: NoteField,
    value: String,
}

#[derive(Debug, Deserialize)]
struct RemoveNoteReq {
    tier: Tier,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct CopyReq {
    text: String,
}

fn build_router(state: Arc<AppState>) -> Router {
    let port = state.server_port.load(Ordering::Relaxed);
    let local_origin = HeaderValue::from_str(&format!("http://127.0.0.1:{port}"))
        .expect("127.0.0.1 origin should be valid");
    let localhost_origin = HeaderValue::from_str(&format!("http://localhost:{port}"))
        .expect("localhost origin should be valid");

    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("null"),
            local_origin,
            localhost_origin,
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(get_main_page))
        .route("/ping", get(get_ping))
        .route("/app/init", get(get_app_init))
        .route("/app/load", post(post_app_load))
        .route("/app/add-note", post(post_app_add_note))
        .route("/app/edit-note", post(post_app_edit_note))
        .route("/app/remove-note", post(post_app_remove_note))
        .route("/app/generate", post(post_app_generate))
        .route("/app/copy", post(post_app_copy))
        .route("/app/reset", post(post_app_reset))
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        .layer(cors)
        .with_state(state)
}

async fn get_main_page() -> Html<String> {
    Html(build_main_ui_html())
}

async fn get_ping() -> ApiResponse {
    ok_json(json!({}))
}

async fn get_app_init(State(state): State<Arc<AppState>>) -> ApiResponse {
    let snapshot = {
        let session = match state.session.lock() {
            Ok(guard) => guard,
            Err(_) => return err_json(StatusCode::INTERNAL_SERVER_ERROR, "session lock error"),
        };
        build_ui_snapshot(&session, &state.config)
    };

    ok_snapshot(snapshot)
}

async fn post_app_load(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoadReq>,
) -> ApiResponse {
    if payload.html.trim().is_empty() {
        return err_json(
            StatusCode::BAD_REQUEST,
            "Cole o HTML do produto antes de carregar.",
        );
    }

    let snapshot = {
        let mut session = match state.session.lock() {
            Ok(guard) => guard,
            Err(_) => return err_json(StatusCode::INTERNAL_SERVER_ERROR, "session lock error"),
        };

        session.load(&payload.html);
        let pyramid = session.pyramid();
        debug!(
            top = pyramid.top.len(),
            heart = pyramid.heart.len(),
            base = pyramid.base.len(),
            "pirâmide carregada do HTML colado"
        );

        build_ui_snapshot(&session, &state.config)
    };

    ok_snapshot(snapshot)
}

async fn post_app_add_note(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddNoteReq>,
) -> ApiResponse {
    let snapshot = {
        let mut session = match state.session.lock() {
            Ok(guard) => guard,
            Err(_) => return err_json(StatusCode::INTERNAL_SERVER_ERROR, "session lock error"),
        };

        session.add_note(payload.tier);
        build_ui_snapshot(&session, &state.config)
    };

    ok_snapshot(snapshot)
}

async fn post_app_edit_note(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EditNoteReq>,
) -> ApiResponse {
    let snapshot = {
        let mut session = match state.session.lock() {
            Ok(guard) => guard,
            Err(_) => return err_json(StatusCode::INTERNAL_SERVER_ERROR, "session lock error"),
        };

        if !session.edit_note(payload.tier, payload.index, payload.field, &payload.value) {
            return err_json(StatusCode::NOT_FOUND, "nota não encontrada");
        }

        build_ui_snapshot(&session, &state.config)
    };

    ok_snapshot(snapshot)
}

async fn post_app_remove_note(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RemoveNoteReq>,
) -> ApiResponse {
    let snapshot = {
        let mut session = match state.session.lock() {
            Ok(guard) => guard,
            Err(_) => return err_json(StatusCode::INTERNAL_SERVER_ERROR, "session lock error"),
        };

        if !session.remove_note(payload.tier, payload.index) {
            return err_json(StatusCode::NOT_FOUND, "nota não encontrada");
        }

        build_ui_snapshot(&session, &state.config)
    };

    ok_snapshot(snapshot)
}

async fn post_app_generate(State(state): State<Arc<AppState>>) -> ApiResponse {
    let snapshot = {
        let mut session = match state.session.lock() {
            Ok(guard) => guard,
            Err(_) => return err_json(StatusCode::INTERNAL_SERVER_ERROR, "session lock error"),
        };

        let output_len = session.generate().len();
        debug!(output_len, "documento de saída regenerado");

        build_ui_snapshot(&session, &state.config)
    };

    ok_snapshot(snapshot)
}

async fn post_app_copy(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CopyReq>,
) -> ApiResponse {
    let text = payload.text;
    if text.trim().is_empty() {
        return ok_json(json!({ "skipped": true }));
    }

    let debounce = state.config.copy_debounce_sec();

    {
        let mut copy_state = match state.copy_state.lock() {
            Ok(guard) => guard,
            Err(_) => return err_json(StatusCode::INTERNAL_SERVER_ERROR, "copy state lock error"),
        };

        if copy_state.last_text == text {
            if let Some(last_copy) = copy_state.last_copy_time {
                if last_copy.elapsed().as_secs_f64() <= debounce {
                    return ok_json(json!({ "skipped": true }));
                }
            }
        }

        if let Err(err) = copy_to_system_clipboard(&text) {
            warn!(%err, "falha ao escrever na área de transferência");
            return err_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("clipboard error: {err}"),
            );
        }

        copy_state.last_text = text;
        copy_state.last_copy_time = Some(Instant::now());
    }

    ok_json(json!({ "skipped": false }))
}

async fn post_app_reset(State(state): State<Arc<AppState>>) -> ApiResponse {
    let snapshot = {
        let mut session = match state.session.lock() {
            Ok(guard) => guard,
            Err(_) => return err_json(StatusCode::INTERNAL_SERVER_ERROR, "session lock error"),
        };

        session.reset();
        build_ui_snapshot(&session, &state.config)
    };

    ok_snapshot(snapshot)
}

fn ok_json(payload: Value) -> ApiResponse {
    let mut body = serde_json::Map::new();
    body.insert("ok".to_string(), Value::Bool(true));

    if let Some(obj) = payload.as_object() {
        for (key, value) in obj {
            body.insert(key.clone(), value.clone());
        }
    } else if !payload.is_null() {
        body.insert("data".to_string(), payload);
    }

    (StatusCode::OK, Json(Value::Object(body)))
}

fn ok_snapshot(snapshot: UiSnapshot) -> ApiResponse {
    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "editing": snapshot.editing,
            "tiers": snapshot.tiers,
            "output": snapshot.output,
            "confirm_remove": snapshot.confirm_remove,
        })),
    )
}

fn err_json(status: StatusCode, message: &str) -> ApiResponse {
    (
        status,
        Json(json!({
            "ok": false,
            "error": message,
        })),
    )
}

fn build_ui_snapshot(session: &EditorSession, config: &ConfigStore) -> UiSnapshot {
    let tiers = Tier::ALL
        .into_iter()
        .map(|tier| TierSnapshot {
            tier,
            label: tier.label(),
            notes: session.pyramid().notes(tier).to_vec(),
        })
        .collect();

    UiSnapshot {
        editing: session.is_editing(),
        tiers,
        output: session.output_html().to_string(),
        confirm_remove: config.confirm_remove(),
    }
}

fn bind_listener(preferred_port: u16) -> Result<TcpListener> {
    for offset in 0..200u16 {
        let port = preferred_port.saturating_add(offset);
        if port == 0 {
            continue;
        }

        if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)) {
            return Ok(listener);
        }
    }

    Err(anyhow!("falha ao reservar uma porta para o servidor"))
}

#[cfg(target_os = "windows")]
fn copy_to_system_clipboard(text: &str) -> Result<()> {
    clipboard_win::set_clipboard_string(text)
        .map_err(|err| anyhow!("failed to write clipboard: {err}"))
}

#[cfg(not(target_os = "windows"))]
fn copy_to_system_clipboard(_text: &str) -> Result<()> {
    Ok(())
}
