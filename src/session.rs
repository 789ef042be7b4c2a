//! Session-scoped context: the single owner of the navigation position and
//! of whatever is currently on screen.

use crate::model::{Listing, RepoSummary};
use crate::nav::Position;
use crate::remote::{ApiError, ContentClient};
use crate::sync::BatchReport;

pub struct Session {
    position: Position,
    repos: Vec<RepoSummary>,
    listing: Option<Listing>,
}

impl Session {
    /// Start a session at an account's repository list.
    pub fn open_account(account: impl Into<String>) -> Self {
        Self::with_position(Position::repo_list(account))
    }

    pub fn with_position(position: Position) -> Self {
        Self {
            position,
            repos: Vec::new(),
            listing: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn repos(&self) -> &[RepoSummary] {
        &self.repos
    }

    pub fn listing(&self) -> Option<&Listing> {
        self.listing.as_ref()
    }

    /// Re-fetch whatever the current position shows. A missing path renders
    /// as an empty folder, not a hard error; everything else propagates.
    pub async fn refresh(&mut self, client: &ContentClient) -> Result<(), ApiError> {
        match self.position.tree() {
            Some(tree) => match client.list_directory(tree).await {
                Ok(listing) => self.listing = Some(listing),
                Err(ApiError::NotFound) => self.listing = Some(Listing::default()),
                Err(err) => return Err(err),
            },
            None => {
                self.repos = client
                    .list_account_repositories(self.position.account())
                    .await?;
                self.listing = None;
            }
        }
        Ok(())
    }

    /// Switch to another account's repository list.
    pub async fn switch_account(
        &mut self,
        client: &ContentClient,
        account: &str,
    ) -> Result<(), ApiError> {
        self.position.open_account(account);
        self.listing = None;
        self.refresh(client).await
    }

    /// Open a repository from the list at its root.
    pub async fn open_repository(
        &mut self,
        client: &ContentClient,
        name: &str,
        default_branch: &str,
    ) -> Result<(), ApiError> {
        self.position.open_repository(name, default_branch);
        self.refresh(client).await
    }

    /// Descend into a child folder of the current one.
    pub async fn enter_folder(
        &mut self,
        client: &ContentClient,
        name: &str,
    ) -> Result<(), ApiError> {
        if let Some(tree) = self.position.tree_mut() {
            tree.enter_folder(name);
        }
        self.refresh(client).await
    }

    /// One step up; at the repository root this returns to the account's
    /// repository list.
    pub async fn go_up(&mut self, client: &ContentClient) -> Result<(), ApiError> {
        self.position.go_up();
        if self.position.tree().is_none() {
            self.listing = None;
        }
        self.refresh(client).await
    }

    /// Jump straight to a breadcrumb target.
    pub async fn jump_to(
        &mut self,
        client: &ContentClient,
        target: Position,
    ) -> Result<(), ApiError> {
        self.position = target;
        self.refresh(client).await
    }

    /// Apply a finished batch's refresh listing, but only if the user is
    /// still where the batch was issued. Stale results for an abandoned
    /// folder are discarded, not applied.
    pub fn absorb_batch(&mut self, report: &BatchReport) -> bool {
        let current = self.position.tree().map(|t| t.key());
        if current.as_ref() != Some(&report.issued_at) {
            log::warn!(
                "discarding batch results for abandoned folder {:?}",
                report.issued_at.path
            );
            return false;
        }
        match &report.listing {
            Ok(listing) => self.listing = Some(listing.clone()),
            Err(ApiError::NotFound) => self.listing = Some(Listing::default()),
            Err(_) => {}
        }
        true
    }
}
