#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::json;

use roam::model::ExplorerConfig;
use roam::nav::Position;
use roam::prefs::Credential;
use roam::remote::ContentClient;

/// In-process stand-in for the remote content service: the contents
/// endpoints with sha preconditions, plus per-folder listing counters so
/// tests can assert refresh counts.
pub struct MockRemote {
    pub base_url: String,
    state: RemoteState,
}

#[derive(Clone, Default)]
struct RemoteState(Arc<Mutex<RemoteInner>>);

#[derive(Default)]
struct RemoteInner {
    repos: HashMap<String, Vec<serde_json::Value>>,
    files: HashMap<String, FileRecord>,
    listing_hits: HashMap<String, usize>,
    conflict_paths: HashSet<String>,
}

#[derive(Clone)]
struct FileRecord {
    bytes: Vec<u8>,
    token: String,
}

fn token_for(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

impl MockRemote {
    pub async fn spawn() -> MockRemote {
        let state = RemoteState::default();
        let app = Router::new()
            .route("/users/:account/repos", get(list_repos))
            .route("/repos/:owner/:repo/contents/", get(contents_root))
            .route(
                "/repos/:owner/:repo/contents/*path",
                get(get_contents).put(put_contents).delete(delete_contents),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock remote");
        let addr = listener.local_addr().expect("mock remote addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock remote");
        });

        MockRemote {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn add_repo(
        &self,
        account: &str,
        name: &str,
        default_branch: &str,
        updated_at: &str,
        private: bool,
    ) {
        let mut inner = self.state.0.lock().unwrap();
        inner.repos.entry(account.to_string()).or_default().push(json!({
            "name": name,
            "private": private,
            "default_branch": default_branch,
            "updated_at": updated_at,
            "language": "Rust",
        }));
    }

    /// Store a file directly, returning its version token.
    pub fn seed_file(&self, path: &str, bytes: &[u8]) -> String {
        let token = token_for(bytes);
        let mut inner = self.state.0.lock().unwrap();
        inner.files.insert(
            path.to_string(),
            FileRecord {
                bytes: bytes.to_vec(),
                token: token.clone(),
            },
        );
        token
    }

    pub fn file_bytes(&self, path: &str) -> Option<Vec<u8>> {
        let inner = self.state.0.lock().unwrap();
        inner.files.get(path).map(|r| r.bytes.clone())
    }

    pub fn file_token(&self, path: &str) -> Option<String> {
        let inner = self.state.0.lock().unwrap();
        inner.files.get(path).map(|r| r.token.clone())
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.state.0.lock().unwrap().files.contains_key(path)
    }

    /// How many directory listings were served for `dir` ("" = root).
    pub fn listing_hits(&self, dir: &str) -> usize {
        let inner = self.state.0.lock().unwrap();
        inner.listing_hits.get(dir).copied().unwrap_or(0)
    }

    /// Rig every write to `path` to fail the sha precondition.
    pub fn force_write_conflicts(&self, path: &str) {
        let mut inner = self.state.0.lock().unwrap();
        inner.conflict_paths.insert(path.to_string());
    }
}

/// Content client pointed at the mock, authenticated with a dev token.
pub fn client(remote: &MockRemote) -> ContentClient {
    let config = ExplorerConfig {
        api_base: remote.base_url.clone(),
        raw_base: format!("{}/raw", remote.base_url),
    };
    ContentClient::new(config, Credential::new(Some("dev".to_string())))
        .expect("build content client")
}

/// Position inside alice/notes on main, descended through `path`.
pub fn tree_position(path: &[&str]) -> Position {
    let mut position = Position::repo_list("alice");
    position.open_repository("notes", "main");
    let tree = position.tree_mut().expect("tree position");
    for seg in path {
        tree.enter_folder(*seg);
    }
    position
}

async fn list_repos(State(state): State<RemoteState>, Path(account): Path<String>) -> Response {
    let inner = state.0.lock().unwrap();
    let rows = inner.repos.get(&account).cloned().unwrap_or_default();
    Json(rows).into_response()
}

async fn contents_root(
    State(state): State<RemoteState>,
    Path((_owner, _repo)): Path<(String, String)>,
) -> Response {
    list_dir(&state, String::new())
}

async fn get_contents(
    State(state): State<RemoteState>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
) -> Response {
    let path = path.trim_matches('/').to_string();
    {
        let inner = state.0.lock().unwrap();
        if let Some(rec) = inner.files.get(&path) {
            return Json(json!({
                "name": leaf(&path),
                "path": path,
                "sha": rec.token,
                "type": "file",
            }))
            .into_response();
        }
    }
    list_dir(&state, path)
}

fn list_dir(state: &RemoteState, dir: String) -> Response {
    let mut inner = state.0.lock().unwrap();

    let prefix = if dir.is_empty() {
        String::new()
    } else {
        format!("{dir}/")
    };
    let mut folders = BTreeSet::new();
    let mut files = Vec::new();
    for (path, rec) in &inner.files {
        let Some(rest) = path.strip_prefix(&prefix) else {
            continue;
        };
        match rest.split_once('/') {
            Some((child, _)) => {
                folders.insert(child.to_string());
            }
            None => files.push(json!({
                "name": rest,
                "path": path,
                "sha": rec.token,
                "type": "file",
            })),
        }
    }

    // Like the real store, a folder exists only through its files.
    if !dir.is_empty() && folders.is_empty() && files.is_empty() {
        return not_found();
    }

    *inner.listing_hits.entry(dir).or_default() += 1;

    let mut entries: Vec<serde_json::Value> = folders
        .into_iter()
        .map(|name| {
            let full = format!("{prefix}{name}");
            json!({
                "name": name,
                "path": full,
                "sha": token_for(name.as_bytes()),
                "type": "dir",
            })
        })
        .collect();
    entries.extend(files);
    Json(entries).into_response()
}

#[derive(Deserialize)]
struct PutBody {
    content: String,
    #[serde(default)]
    sha: Option<String>,
}

async fn put_contents(
    State(state): State<RemoteState>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<PutBody>,
) -> Response {
    if let Some(resp) = require_auth(&headers) {
        return resp;
    }
    let path = path.trim_matches('/').to_string();
    let mut inner = state.0.lock().unwrap();

    if inner.conflict_paths.contains(&path) {
        return conflict(&format!("{path} does not match the stored sha"));
    }
    match (inner.files.get(&path), &body.sha) {
        (Some(existing), Some(sha)) if *sha != existing.token => {
            return conflict(&format!("{path} does not match the stored sha"));
        }
        (Some(_), None) => {
            return unprocessable(&format!("\"sha\" wasn't supplied for existing {path}"));
        }
        (None, Some(_)) => {
            return unprocessable(&format!("sha supplied but {path} does not exist"));
        }
        _ => {}
    }

    let Ok(bytes) = STANDARD.decode(&body.content) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "content is not valid base64"})),
        )
            .into_response();
    };
    let token = token_for(&bytes);
    let created = !inner.files.contains_key(&path);
    inner.files.insert(
        path.clone(),
        FileRecord {
            bytes,
            token: token.clone(),
        },
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (
        status,
        Json(json!({"content": {"path": path, "sha": token}, "commit": {}})),
    )
        .into_response()
}

#[derive(Deserialize)]
struct DeleteBody {
    sha: String,
}

async fn delete_contents(
    State(state): State<RemoteState>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<DeleteBody>,
) -> Response {
    if let Some(resp) = require_auth(&headers) {
        return resp;
    }
    let path = path.trim_matches('/').to_string();
    let mut inner = state.0.lock().unwrap();

    let Some(existing) = inner.files.get(&path) else {
        return not_found();
    };
    if existing.token != body.sha {
        return conflict(&format!("{path} does not match the stored sha"));
    }
    inner.files.remove(&path);
    Json(json!({"content": null, "commit": {}})).into_response()
}

fn require_auth(headers: &HeaderMap) -> Option<Response> {
    let authorized = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "));
    if authorized {
        None
    } else {
        Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Requires authentication"})),
            )
                .into_response(),
        )
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Not Found"})),
    )
        .into_response()
}

fn conflict(message: &str) -> Response {
    (
        StatusCode::CONFLICT,
        Json(json!({"message": message})),
    )
        .into_response()
}

fn unprocessable(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"message": message})),
    )
        .into_response()
}

fn leaf(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
