//! Navigation position and transitions. Transitions never perform I/O; the
//! caller follows each one with a fetch against the content client.

mod breadcrumb;

pub use self::breadcrumb::{Crumb, breadcrumbs};

/// Which of the two explorer surfaces is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The account's repository list.
    RepoList,
    /// A folder inside an opened repository.
    RepoTree,
}

/// Where the user currently is. A repository selection, when present,
/// carries its branch and folder path, so "repository open" and "browsing
/// the repository list" cannot both hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    account: String,
    repo: Option<TreePosition>,
}

/// A folder inside one repository on one branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreePosition {
    pub owner: String,
    pub repository: String,
    pub branch: String,
    path: Vec<String>,
}

/// Identity of one listing: which folder a fetch or batch was issued
/// against. Used to discard results arriving after the user navigated away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingKey {
    pub owner: String,
    pub repository: String,
    pub branch: String,
    pub path: String,
}

impl Position {
    /// Start at an account's repository list.
    pub fn repo_list(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            repo: None,
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn mode(&self) -> Mode {
        if self.repo.is_some() {
            Mode::RepoTree
        } else {
            Mode::RepoList
        }
    }

    pub fn tree(&self) -> Option<&TreePosition> {
        self.repo.as_ref()
    }

    pub fn tree_mut(&mut self) -> Option<&mut TreePosition> {
        self.repo.as_mut()
    }

    /// Switch accounts; drops any opened repository.
    pub fn open_account(&mut self, account: impl Into<String>) {
        self.account = account.into();
        self.repo = None;
    }

    /// Open one of the account's repositories at its root.
    pub fn open_repository(&mut self, name: impl Into<String>, default_branch: impl Into<String>) {
        self.repo = Some(TreePosition {
            owner: self.account.clone(),
            repository: name.into(),
            branch: default_branch.into(),
            path: Vec::new(),
        });
    }

    /// One step up: pop a path segment, or leave the repository for the
    /// account's repository list when already at its root. The cross-mode
    /// step is the same however root was reached.
    pub fn go_up(&mut self) {
        match &mut self.repo {
            Some(tree) if !tree.path.is_empty() => {
                tree.path.pop();
            }
            Some(_) => self.repo = None,
            None => {}
        }
    }
}

impl TreePosition {
    pub fn segments(&self) -> &[String] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Slash-joined path from the repository root; empty at the root.
    pub fn joined_path(&self) -> String {
        self.path.join("/")
    }

    /// Path of a direct child of the current folder.
    pub fn child_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.joined_path(), name)
        }
    }

    pub fn enter_folder(&mut self, name: impl Into<String>) {
        self.path.push(name.into());
    }

    /// Truncate to the first `depth` segments; 0 is the repository root.
    pub fn go_to_ancestor(&mut self, depth: usize) {
        self.path.truncate(depth);
    }

    pub fn key(&self) -> ListingKey {
        ListingKey {
            owner: self.owner.clone(),
            repository: self.repository.clone(),
            branch: self.branch.clone(),
            path: self.joined_path(),
        }
    }
}
