//! # Gateway HTTP Control Surface
//!
//! Axum endpoints through which operators drive the badges:
//!
//! - `POST /sendtext` - JSON body (mac + text fields), forwarded as a single
//!   control message; the transport's accept/reject outcome is echoed in a
//!   `status` field.
//! - `POST /sendlogo` - binary body (address header + newline + raw bitmap),
//!   accepted optimistically and handed to the paced chunk sender.
//! - `POST /clearbadge` - forwards a clear control message.
//! - `POST /addmac` / `POST /deletemac` - persisted address set maintenance.
//! - `GET /` - management page listing known badges.
//!
//! The HTTP path never waits on the radio beyond the single non-blocking
//! `send` call for text and clear; bitmap pacing always runs on its own task.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use crate::protocol::{ControlMessage, PeerAddress};
use crate::radio::RadioTransport;
use crate::storage::PeerStore;

pub mod sender;

pub use sender::{split_upload, ChunkedSender, UploadError, UPLOAD_HEADER_LEN};

/// Shared state behind every handler.
pub struct AppState {
    pub store: PeerStore,
    pub radio: Arc<dyn RadioTransport>,
    pub sender: ChunkedSender,
    /// Full-frame bitmap size of the target panels.
    pub bitmap_len: usize,
}

#[derive(Debug, Deserialize)]
struct SendTextRequest {
    mac: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    additional_info: String,
}

#[derive(Debug, Deserialize)]
struct MacRequest {
    mac: String,
}

/// Build the router. The body limit covers the largest legal logo upload.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = UPLOAD_HEADER_LEN + state.bitmap_len;
    Router::new()
        .route("/", get(index))
        .route("/sendtext", post(sendtext))
        .route("/sendlogo", post(sendlogo))
        .route("/clearbadge", post(clearbadge))
        .route("/addmac", post(addmac))
        .route("/deletemac", post(deletemac))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn run(state: Arc<AppState>, bind: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("gateway listening on {}", listener.local_addr()?);
    axum::serve(listener, router(Arc::clone(&state)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    state.sender.shutdown().await;
    Ok(())
}

async fn index(State(state): State<Arc<AppState>>) -> Response {
    let peers = match state.store.list() {
        Ok(peers) => peers,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to list badges: {}", e),
            )
                .into_response()
        }
    };
    Html(render_index(&peers)).into_response()
}

async fn sendtext(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendTextRequest>,
) -> Response {
    let destination: PeerAddress = match req.mac.parse() {
        Ok(addr) => addr,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid MAC format").into_response(),
    };
    if req.first_name.is_empty() && req.last_name.is_empty() && req.additional_info.is_empty() {
        return (StatusCode::BAD_REQUEST, "At least one field must be provided").into_response();
    }

    let msg = ControlMessage::text(&req.first_name, &req.last_name, &req.additional_info);
    let payload = match serde_json::to_vec(&msg) {
        Ok(payload) => payload,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    info!(
        "text send to {}: first={:?} last={:?} info={:?}",
        destination,
        crate::logutil::escape_log(&req.first_name),
        crate::logutil::escape_log(&req.last_name),
        crate::logutil::escape_log(&req.additional_info),
    );
    Json(json!({ "status": send_status(&*state.radio, destination, &payload) })).into_response()
}

async fn clearbadge(State(state): State<Arc<AppState>>, Json(req): Json<MacRequest>) -> Response {
    let destination: PeerAddress = match req.mac.parse() {
        Ok(addr) => addr,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid MAC format").into_response(),
    };
    let payload = match serde_json::to_vec(&ControlMessage::clear()) {
        Ok(payload) => payload,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };
    info!("clear command to {}", destination);
    Json(json!({ "status": send_status(&*state.radio, destination, &payload) })).into_response()
}

async fn sendlogo(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let (destination, bitmap) = match split_upload(&body, state.bitmap_len) {
        Ok(parts) => parts,
        Err(e) => {
            warn!("rejected logo upload: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    info!("got {} logo bytes for {}", bitmap.len(), destination);
    let _transfer = state.sender.send_bitmap(destination, bitmap.to_vec());
    (StatusCode::OK, "Logo uploaded").into_response()
}

async fn addmac(State(state): State<Arc<AppState>>, Json(req): Json<MacRequest>) -> Response {
    let addr: PeerAddress = match req.mac.parse() {
        Ok(addr) => addr,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid MAC format").into_response(),
    };
    match state.store.add(addr) {
        Ok(true) => {
            if let Err(e) = state.radio.register_peer(addr) {
                warn!("could not register {} with transport: {}", addr, e);
            }
            info!("registered badge {}", addr);
            (StatusCode::OK, "MAC saved").into_response()
        }
        Ok(false) => (StatusCode::OK, "Already registered").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn deletemac(State(state): State<Arc<AppState>>, Json(req): Json<MacRequest>) -> Response {
    let addr: PeerAddress = match req.mac.parse() {
        Ok(addr) => addr,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid MAC format").into_response(),
    };
    match state.store.remove(addr) {
        Ok(true) => {
            info!("deleted badge {}", addr);
            (StatusCode::OK, "MAC deleted").into_response()
        }
        Ok(false) => (StatusCode::NOT_FOUND, "MAC not found").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

fn send_status(radio: &dyn RadioTransport, destination: PeerAddress, payload: &[u8]) -> String {
    match radio.send(destination, payload) {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            warn!("send to {} failed: {}", destination, e);
            e.to_string()
        }
    }
}

/// One management block per known badge, injected into the page template.
fn render_index(peers: &[PeerAddress]) -> String {
    let mut blocks = String::new();
    for peer in peers {
        let mac = peer.to_string();
        blocks.push_str(&format!(
            concat!(
                "<div class=\"badge-block\" data-mac=\"{mac}\">",
                "<h3>{mac}</h3>",
                "<form onsubmit=\"sendText(event,'{mac}')\">",
                "<input type=\"text\" name=\"first_name\" placeholder=\"First Name\">",
                "<input type=\"text\" name=\"last_name\" placeholder=\"Last Name\">",
                "<input type=\"text\" name=\"additional_info\" placeholder=\"Additional Info\">",
                "<div class=\"row\">",
                "<button type=\"submit\">Send</button>",
                "<button type=\"button\" onclick=\"clearBadge('{mac}')\">Clear</button>",
                "<button type=\"button\" onclick=\"deleteMac('{mac}')\">Delete</button>",
                "</div></form>",
                "<div class=\"logo-block\">",
                "<input type=\"file\" id=\"logoInput_{mac}\" accept=\"image/*\">",
                "<button onclick=\"sendLogo('{mac}')\">Send Image</button>",
                "</div></div>"
            ),
            mac = mac
        ));
    }
    INDEX_TEMPLATE.replace("<!-- {{MAC_LIST}} -->", &blocks)
}

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Inkbadge Gateway</title>
<style>
body { font-family: sans-serif; margin: 2em; }
.badge-block { border: 1px solid #ccc; padding: 1em; margin-bottom: 1em; }
.row { display: flex; gap: 8px; margin-top: 8px; }
input[type=text] { display: block; margin-top: 4px; }
</style>
<script>
async function postJson(url, body) {
  const res = await fetch(url, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) });
  alert(await res.text());
}
function sendText(ev, mac) {
  ev.preventDefault();
  const f = ev.target;
  postJson('/sendtext', { mac: mac, first_name: f.first_name.value, last_name: f.last_name.value, additional_info: f.additional_info.value });
}
function clearBadge(mac) { postJson('/clearbadge', { mac: mac }); }
function deleteMac(mac) { postJson('/deletemac', { mac: mac }).then(() => location.reload()); }
function addMac() { postJson('/addmac', { mac: document.getElementById('newmac').value }).then(() => location.reload()); }
async function sendLogo(mac) {
  const input = document.getElementById('logoInput_' + mac);
  if (!input.files.length) { alert('Pick an image first'); return; }
  const bytes = new Uint8Array(await input.files[0].arrayBuffer());
  const header = new TextEncoder().encode(mac + '\n');
  const body = new Uint8Array(header.length + bytes.length);
  body.set(header); body.set(bytes, header.length);
  const res = await fetch('/sendlogo', { method: 'POST', body: body });
  alert(await res.text());
}
</script>
</head>
<body>
<h1>Inkbadge Gateway</h1>
<div>
<input type="text" id="newmac" placeholder="AA:BB:CC:DD:EE:FF">
<button onclick="addMac()">Register badge</button>
</div>
<hr>
<!-- {{MAC_LIST}} -->
</body>
</html>
"#;
