use crate::model::{
    DirectoryEntry, EntryKind, ExplorerConfig, Listing, RepoSummary, VersionToken, ViewerRequest,
};
use crate::nav::TreePosition;
use crate::prefs::Credential;

mod contents;
mod error;
mod http;
mod repos;
mod types;

pub use self::error::ApiError;

use self::http::{decode_json, encode_payload, with_retries};
use self::types::*;

/// Authenticated HTTP client for the remote store's content endpoints.
pub struct ContentClient {
    config: ExplorerConfig,
    credential: Credential,
    client: reqwest::Client,
}

impl ContentClient {
    pub fn new(config: ExplorerConfig, credential: Credential) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent("roam")
            .build()
            .map_err(ApiError::from_reqwest)?;
        Ok(Self {
            config,
            credential,
            client,
        })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }
}
