use serde::{Deserialize, Serialize};

/// Opaque identifier for the version of a stored file's content. The remote
/// requires it as a precondition for safe overwrite and delete.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionToken(pub String);

impl VersionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One row of an account's repository list, most recently updated first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub private: bool,
    pub default_branch: String,

    /// Last update time as reported by the remote (RFC 3339).
    pub last_updated: String,

    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

/// One entry of a directory listing snapshot. Snapshots are re-fetched
/// fresh on every navigation, never carried across hops.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,

    /// Full path from the repository root.
    pub path: String,

    /// Present only for files.
    #[serde(default)]
    pub version_token: Option<VersionToken>,
}

/// Contents of one folder, each group name-sorted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Listing {
    pub folders: Vec<DirectoryEntry>,
    pub files: Vec<DirectoryEntry>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    pub fn find_file(&self, name: &str) -> Option<&DirectoryEntry> {
        self.files.iter().find(|f| f.name == name)
    }
}

/// Handoff to the document viewer collaborator: the viewer fetches and
/// renders the URL itself, the core stops here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewerRequest {
    pub repository: String,
    pub branch: String,
    pub path: String,
    pub url: String,
}
