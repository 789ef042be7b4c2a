//! DTOs for remote API requests and responses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(super) struct RepoView {
    pub(super) name: String,

    #[serde(default)]
    pub(super) private: bool,

    #[serde(default)]
    pub(super) default_branch: Option<String>,

    #[serde(default)]
    pub(super) updated_at: Option<String>,

    #[serde(default)]
    pub(super) language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ContentView {
    pub(super) name: String,
    pub(super) path: String,
    pub(super) sha: String,

    #[serde(rename = "type")]
    pub(super) kind: ContentKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum ContentKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// Single-path probe response; only the token matters to us.
#[derive(Debug, Deserialize)]
pub(super) struct FileProbeView {
    pub(super) sha: String,
}

#[derive(Debug, Serialize)]
pub(super) struct WriteFileRequest<'a> {
    pub(super) message: String,
    pub(super) content: String,
    pub(super) branch: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeleteFileRequest<'a> {
    pub(super) message: String,
    pub(super) sha: &'a str,
    pub(super) branch: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct WriteFileResponse {
    pub(super) content: WrittenContent,
}

#[derive(Debug, Deserialize)]
pub(super) struct WrittenContent {
    pub(super) sha: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorView {
    pub(super) message: String,
}
