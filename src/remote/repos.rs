use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::*;

impl ContentClient {
    /// List an account's repositories, most recently updated first.
    pub async fn list_account_repositories(
        &self,
        account: &str,
    ) -> Result<Vec<RepoSummary>, ApiError> {
        let path = format!("/users/{account}/repos?per_page=100&sort=updated");
        let views: Vec<RepoView> = with_retries("list repositories", || {
            self.get_json(path.clone(), "list repositories")
        })
        .await?;

        let mut repos: Vec<RepoSummary> = views
            .into_iter()
            .map(|v| RepoSummary {
                name: v.name,
                private: v.private,
                default_branch: v.default_branch.unwrap_or_else(|| "main".to_string()),
                last_updated: v.updated_at.unwrap_or_default(),
                language: v.language,
            })
            .collect();

        // The remote already sorts by update time; re-sort so the ordering
        // contract does not hang on the query string.
        repos.sort_by(|a, b| update_time(&b.last_updated).cmp(&update_time(&a.last_updated)));

        log::debug!("listed {} repositories for {account}", repos.len());
        Ok(repos)
    }
}

fn update_time(raw: &str) -> OffsetDateTime {
    OffsetDateTime::parse(raw, &Rfc3339).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}
