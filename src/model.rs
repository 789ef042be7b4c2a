mod config;
mod entries;

pub use self::config::ExplorerConfig;
pub use self::entries::{
    DirectoryEntry, EntryKind, Listing, RepoSummary, VersionToken, ViewerRequest,
};
