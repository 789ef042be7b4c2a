//! Synchronization engine: turns user mutation intents into safe remote
//! call sequences under the remote's version-token preconditions.

use futures::future::join_all;

use crate::model::{Listing, VersionToken};
use crate::nav::{ListingKey, TreePosition};
use crate::remote::{ApiError, ContentClient};

/// One planned remote mutation: what to do at `target_path`, under which
/// version precondition. Consumed by value exactly once; a failed send is
/// reported, never replayed.
#[derive(Debug)]
pub struct MutationRequest {
    pub target_path: String,
    pub kind: MutationKind,
    pub known_version_token: Option<VersionToken>,
}

#[derive(Debug)]
pub enum MutationKind {
    /// Write a path the probe saw no token for.
    Create { payload: Vec<u8> },
    /// Overwrite under the probed token.
    Update { payload: Vec<u8> },
    /// Remove under the listing-time token.
    Delete,
}

#[derive(Debug)]
pub enum MutationOutcome {
    Written(VersionToken),
    Deleted,
}

/// Explicit user consent for a destructive action. Minted by the UI after
/// its confirmation step, decoupled from any dialog mechanism; no delete
/// call fires without one.
#[derive(Debug)]
pub struct DeleteConfirmation(());

impl DeleteConfirmation {
    pub fn confirmed() -> Self {
        Self(())
    }
}

/// One file selected for upload into the current folder.
#[derive(Clone, Debug)]
pub struct UploadItem {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Per-item result; one item's failure never discards its siblings'.
#[derive(Debug)]
pub struct ItemReport {
    pub name: String,
    pub outcome: Result<MutationOutcome, ApiError>,
}

impl ItemReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Everything a finished batch produced, tagged with the folder identity it
/// was issued against so results arriving late can be discarded.
#[derive(Debug)]
pub struct BatchReport {
    pub issued_at: ListingKey,
    pub items: Vec<ItemReport>,

    /// Outcome of the single post-batch listing refresh.
    pub listing: Result<Listing, ApiError>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

impl MutationRequest {
    /// Send the planned mutation to the remote, consuming it.
    pub async fn send(
        self,
        client: &ContentClient,
        tree: &TreePosition,
    ) -> Result<MutationOutcome, ApiError> {
        match self.kind {
            MutationKind::Create { payload } | MutationKind::Update { payload } => {
                let token = client
                    .write_file(
                        tree,
                        &self.target_path,
                        &payload,
                        self.known_version_token.as_ref(),
                    )
                    .await?;
                Ok(MutationOutcome::Written(token))
            }
            MutationKind::Delete => {
                let token = self.known_version_token.ok_or_else(|| {
                    ApiError::Conflict("delete requires the listing-time version token".to_string())
                })?;
                client.delete_file(tree, &self.target_path, &token).await?;
                Ok(MutationOutcome::Deleted)
            }
        }
    }
}

/// Plan a create-or-update for `target_path` from a fresh token probe.
///
/// The probe is best-effort: a probe *error* means "no token known" and the
/// write goes out as a create. The race between probe and write is real and
/// surfaces as a conflict from the write itself, never assumed away.
pub async fn plan_write(
    client: &ContentClient,
    tree: &TreePosition,
    target_path: &str,
    payload: Vec<u8>,
) -> MutationRequest {
    let known = match client.read_version_token(tree, target_path).await {
        Ok(token) => token,
        Err(err) => {
            log::warn!("version probe for {target_path} failed ({err}); treating as new file");
            None
        }
    };
    let kind = match &known {
        Some(_) => MutationKind::Update { payload },
        None => MutationKind::Create { payload },
    };
    MutationRequest {
        target_path: target_path.to_string(),
        kind,
        known_version_token: known,
    }
}

/// Upload a batch of files into the folder at `tree`.
///
/// Items resolve independently and may run concurrently; each item's
/// probe-then-write pair stays ordered inside its own future, so pairs never
/// interleave in a way that could swap tokens. Exactly one listing refresh
/// is issued after every item has resolved, whatever the outcomes.
pub async fn upload_batch(
    client: &ContentClient,
    tree: &TreePosition,
    items: Vec<UploadItem>,
) -> BatchReport {
    let flows = items.into_iter().map(|UploadItem { name, bytes }| {
        let target = tree.child_path(&name);
        async move {
            let request = plan_write(client, tree, &target, bytes).await;
            let outcome = request.send(client, tree).await;
            ItemReport { name, outcome }
        }
    });
    let items = join_all(flows).await;

    let listing = client.list_directory(tree).await;
    BatchReport {
        issued_at: tree.key(),
        items,
        listing,
    }
}

/// Delete one entry using the token already known from the current listing.
///
/// The token is deliberately not re-probed: if the entry changed since the
/// listing, the remote rejects the delete and the user must refresh before
/// retrying. Never force-deletes.
pub async fn delete_entry(
    client: &ContentClient,
    tree: &TreePosition,
    target_path: &str,
    token: VersionToken,
    _confirmation: DeleteConfirmation,
) -> Result<(), ApiError> {
    let request = MutationRequest {
        target_path: target_path.to_string(),
        kind: MutationKind::Delete,
        known_version_token: Some(token),
    };
    request.send(client, tree).await?;
    Ok(())
}
