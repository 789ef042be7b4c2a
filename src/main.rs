use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use roam::model::ExplorerConfig;
use roam::nav::{Position, breadcrumbs};
use roam::prefs::{
    Credential, JsonFilePrefs, PREF_AUTH_TOKEN, PREF_LAST_ACCOUNT, PreferenceStore,
};
use roam::remote::ContentClient;
use roam::session::Session;
use roam::sync::{self, DeleteConfirmation, UploadItem};

#[derive(Parser)]
#[command(name = "roam")]
#[command(about = "Remote repository tree explorer", long_about = None)]
struct Cli {
    /// Override the remote API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Preference file (defaults to ~/.roam-prefs.json)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an access token for authenticated requests
    Login { token: String },

    /// Forget the stored access token
    Logout,

    /// List an account's repositories, most recently updated first
    Repos {
        /// Account to list (defaults to the last-used account)
        account: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List a folder: roam ls account/repo[/path]
    Ls {
        target: String,
        #[arg(long, default_value = "main")]
        branch: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload files into a folder: roam put account/repo[/path] file...
    Put {
        target: String,
        files: Vec<PathBuf>,
        #[arg(long, default_value = "main")]
        branch: String,
    },

    /// Delete a file: roam rm account/repo/path --yes
    Rm {
        target: String,
        #[arg(long, default_value = "main")]
        branch: String,
        /// Confirm the deletion; nothing is deleted without it
        #[arg(long)]
        yes: bool,
    },

    /// Print the raw-content URL handed to the document viewer
    Url {
        target: String,
        #[arg(long, default_value = "main")]
        branch: String,
    },
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn run() -> Result<()> {
    let cli = Cli::parse();

    let prefs_path = cli.prefs.clone().unwrap_or_else(default_prefs_path);
    let mut prefs = JsonFilePrefs::load(&prefs_path)?;

    match cli.command {
        Commands::Login { token } => {
            prefs.set(PREF_AUTH_TOKEN, &token);
            println!("Token stored in {}", prefs_path.display());
        }

        Commands::Logout => {
            prefs.set(PREF_AUTH_TOKEN, "");
            println!("Token cleared");
        }

        Commands::Repos { account, json } => {
            let account = account
                .or_else(|| prefs.get(PREF_LAST_ACCOUNT))
                .context("no account given and none remembered (run `roam repos <account>`)")?;
            prefs.set(PREF_LAST_ACCOUNT, &account);

            let client = content_client(&cli.api_base, &prefs)?;
            let mut session = Session::open_account(&account);
            session.refresh(&client).await?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(session.repos()).context("serialize repos")?
                );
            } else {
                for repo in session.repos() {
                    let vis = if repo.private { "private" } else { "public" };
                    let lang = repo.language.as_deref().unwrap_or("");
                    println!("{}  {}  {}  {}", repo.name, vis, repo.last_updated, lang);
                }
                println!("{} repos for {}", session.repos().len(), account);
            }
        }

        Commands::Ls {
            target,
            branch,
            json,
        } => {
            let (account, repo, path) = parse_target(&target)?;
            let client = content_client(&cli.api_base, &prefs)?;

            let mut session = Session::with_position(position_for(&account, &repo, &branch, &path));
            session.refresh(&client).await?;

            let listing = session.listing().context("no listing for repository path")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(listing).context("serialize listing")?
                );
            } else {
                let trail: Vec<String> = breadcrumbs(session.position())
                    .into_iter()
                    .map(|c| c.label)
                    .collect();
                println!("{}", trail.join(" > "));
                for folder in &listing.folders {
                    println!("{}/", folder.name);
                }
                for file in &listing.files {
                    println!("{}", file.name);
                }
                println!(
                    "{} folders, {} files",
                    listing.folders.len(),
                    listing.files.len()
                );
            }
        }

        Commands::Put {
            target,
            files,
            branch,
        } => {
            anyhow::ensure!(!files.is_empty(), "no files to upload");
            let (account, repo, path) = parse_target(&target)?;
            let client = content_client(&cli.api_base, &prefs)?;
            let position = position_for(&account, &repo, &branch, &path);
            let tree = position.tree().context("not inside a repository")?;

            let mut items = Vec::new();
            for file in &files {
                let name = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .with_context(|| format!("bad file name: {}", file.display()))?;
                let bytes =
                    std::fs::read(file).with_context(|| format!("read {}", file.display()))?;
                items.push(UploadItem {
                    name: name.to_string(),
                    bytes,
                });
            }

            let report = sync::upload_batch(&client, tree, items).await;
            for item in &report.items {
                match &item.outcome {
                    Ok(_) => println!("Uploaded {}", item.name),
                    Err(err) => println!("Failed {}: {}", item.name, err),
                }
            }
            match &report.listing {
                Ok(listing) => println!(
                    "Folder now holds {} folders, {} files",
                    listing.folders.len(),
                    listing.files.len()
                ),
                Err(err) => println!("Listing refresh failed: {}", err),
            }
            if report.failed() > 0 {
                anyhow::bail!("{} of {} uploads failed", report.failed(), report.items.len());
            }
        }

        Commands::Rm {
            target,
            branch,
            yes,
        } => {
            let (account, repo, mut path) = parse_target(&target)?;
            let name = path
                .pop()
                .context("target must name a file: roam rm account/repo/path")?;
            anyhow::ensure!(yes, "refusing to delete {name} without --yes");

            let client = content_client(&cli.api_base, &prefs)?;
            let position = position_for(&account, &repo, &branch, &path);
            let tree = position.tree().context("not inside a repository")?;

            let listing = client
                .list_directory(tree)
                .await
                .context("list folder before delete")?;
            let entry = listing
                .find_file(&name)
                .with_context(|| format!("{name} not found in the current listing"))?;
            let token = entry
                .version_token
                .clone()
                .with_context(|| format!("no version token listed for {name}"))?;

            sync::delete_entry(
                &client,
                tree,
                &tree.child_path(&name),
                token,
                DeleteConfirmation::confirmed(),
            )
            .await?;
            println!("Deleted {target}");
        }

        Commands::Url { target, branch } => {
            let (account, repo, mut path) = parse_target(&target)?;
            let name = path
                .pop()
                .context("target must name a file: roam url account/repo/path")?;
            let client = content_client(&cli.api_base, &prefs)?;
            let position = position_for(&account, &repo, &branch, &path);
            let tree = position.tree().context("not inside a repository")?;

            let viewer = client.viewer_request(tree, &tree.child_path(&name));
            println!("{}", viewer.url);
        }
    }

    Ok(())
}

fn default_prefs_path() -> PathBuf {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".roam-prefs.json")
}

fn content_client(api_base: &Option<String>, prefs: &JsonFilePrefs) -> Result<ContentClient> {
    let config = match api_base {
        Some(base) => ExplorerConfig {
            api_base: base.clone(),
            ..ExplorerConfig::default()
        },
        None => ExplorerConfig::default(),
    };
    let credential = Credential::new(prefs.get(PREF_AUTH_TOKEN));
    ContentClient::new(config, credential).context("build content client")
}

fn parse_target(target: &str) -> Result<(String, String, Vec<String>)> {
    let mut parts = target.split('/').filter(|s| !s.is_empty());
    let account = parts
        .next()
        .context("target must look like account/repo[/path]")?;
    let repo = parts
        .next()
        .context("target must look like account/repo[/path]")?;
    let path: Vec<String> = parts.map(str::to_string).collect();
    Ok((account.to_string(), repo.to_string(), path))
}

fn position_for(account: &str, repo: &str, branch: &str, path: &[String]) -> Position {
    let mut position = Position::repo_list(account);
    position.open_repository(repo, branch);
    if let Some(tree) = position.tree_mut() {
        for seg in path {
            tree.enter_folder(seg.clone());
        }
    }
    position
}
