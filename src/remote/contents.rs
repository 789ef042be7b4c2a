//! Directory listings, version-token reads, and token-guarded writes and
//! deletes against one repository tree.

use super::*;

impl ContentClient {
    fn contents_path(&self, tree: &TreePosition, path: &str) -> String {
        format!(
            "/repos/{}/{}/contents/{}?ref={}",
            tree.owner, tree.repository, path, tree.branch
        )
    }

    /// List the folder at the tree position's current path.
    ///
    /// A remote 404 surfaces as [`ApiError::NotFound`] so callers can tell
    /// "no such path" apart from an empty folder.
    pub async fn list_directory(&self, tree: &TreePosition) -> Result<Listing, ApiError> {
        let path = self.contents_path(tree, &tree.joined_path());
        let views: Vec<ContentView> =
            with_retries("list directory", || self.get_json(path.clone(), "list directory"))
                .await?;

        let mut listing = Listing::default();
        for view in views {
            match view.kind {
                ContentKind::Dir => listing.folders.push(DirectoryEntry {
                    name: view.name,
                    kind: EntryKind::Folder,
                    path: view.path,
                    version_token: None,
                }),
                ContentKind::File => listing.files.push(DirectoryEntry {
                    name: view.name,
                    kind: EntryKind::File,
                    path: view.path,
                    version_token: Some(VersionToken(view.sha)),
                }),
                // No tile in the explorer for these.
                ContentKind::Symlink | ContentKind::Submodule => {}
            }
        }
        listing.folders.sort_by(|a, b| a.name.cmp(&b.name));
        listing.files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }

    /// Current version token for a path, or `None` when the path does not
    /// exist, which is the expected case for new-file creation.
    pub async fn read_version_token(
        &self,
        tree: &TreePosition,
        path: &str,
    ) -> Result<Option<VersionToken>, ApiError> {
        let url = self.contents_path(tree, path);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        match self.ensure_ok(resp, "read version token").await {
            Ok(resp) => {
                let view: FileProbeView = decode_json(resp, "version token").await?;
                Ok(Some(VersionToken(view.sha)))
            }
            Err(ApiError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Write (create or overwrite) one file in a single atomic request.
    ///
    /// A supplied token is sent as the remote's precondition; a stale token
    /// fails with [`ApiError::Conflict`] and leaves the stored content
    /// untouched. Never retried.
    pub async fn write_file(
        &self,
        tree: &TreePosition,
        path: &str,
        content: &[u8],
        known_token: Option<&VersionToken>,
    ) -> Result<VersionToken, ApiError> {
        let name = leaf_name(path);
        let message = match known_token {
            Some(_) => format!("Update {name}"),
            None => format!("Add {name}"),
        };
        let body = WriteFileRequest {
            message,
            content: encode_payload(content),
            branch: &tree.branch,
            sha: known_token.map(VersionToken::as_str),
        };

        let resp = self
            .request(reqwest::Method::PUT, &self.contents_path(tree, path))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        let resp = self
            .ensure_ok(resp, "write file")
            .await
            .map_err(mutation_conflicts)?;
        let view: WriteFileResponse = decode_json(resp, "write file").await?;

        log::debug!("wrote {path} in {}/{}", tree.owner, tree.repository);
        Ok(VersionToken(view.content.sha))
    }

    /// Delete one file under the token obtained at listing time.
    pub async fn delete_file(
        &self,
        tree: &TreePosition,
        path: &str,
        token: &VersionToken,
    ) -> Result<(), ApiError> {
        let body = DeleteFileRequest {
            message: format!("Delete {}", leaf_name(path)),
            sha: token.as_str(),
            branch: &tree.branch,
        };

        let resp = self
            .request(reqwest::Method::DELETE, &self.contents_path(tree, path))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        self.ensure_ok(resp, "delete file")
            .await
            .map_err(mutation_conflicts)?;

        log::debug!("deleted {path} in {}/{}", tree.owner, tree.repository);
        Ok(())
    }

    /// Raw-content handoff for the document viewer. The viewer fetches and
    /// renders on its own; the core's responsibility ends here.
    pub fn viewer_request(&self, tree: &TreePosition, path: &str) -> ViewerRequest {
        ViewerRequest {
            repository: format!("{}/{}", tree.owner, tree.repository),
            branch: tree.branch.clone(),
            path: path.to_string(),
            url: format!(
                "{}/{}/{}/{}/{}",
                self.config.raw_base, tree.owner, tree.repository, tree.branch, path
            ),
        }
    }
}

/// The remote reports a failed `sha` precondition on contents mutations as
/// 409, historically 422; on these paths both can only mean a stale token.
fn mutation_conflicts(err: ApiError) -> ApiError {
    match err {
        ApiError::Remote {
            status: 422,
            message,
        } => ApiError::Conflict(message),
        other => other,
    }
}

fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
