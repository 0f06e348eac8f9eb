//! `folio` command line: the public portfolio, sign-in/up and the protected
//! admin dashboard.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::{
    client::ApiClient,
    projects::{dto::ProjectInput, Project},
    render::{self, DashboardStats, Profile},
    session::{AuthContext, FileSessionStore, SessionStore},
};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio viewer and admin console")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, global = true, env = "FOLIO_API_URL", default_value = "http://localhost:3001")]
    pub server: String,

    /// Where the signed-in session is kept (defaults to the user config dir)
    #[arg(long, global = true, env = "FOLIO_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Print raw JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the API server is up
    Health,
    /// Show the public portfolio
    Portfolio,
    /// Create an account and sign in
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Sign in and remember the session
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the saved session
    SignOut,
    /// Account details of the signed-in user
    Account,
    /// Overview stats
    Dashboard,
    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Upload an image file and print its URL
    Upload { file: PathBuf },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    List,
    Get {
        id: String,
    },
    Create(ProjectForm),
    Edit {
        id: String,
        #[command(flatten)]
        form: ProjectForm,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ProjectForm {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub github_url: Option<String>,
    #[arg(long)]
    pub linkedin_url: Option<String>,
    #[arg(long)]
    pub demo_url: Option<String>,
    /// Image URL to attach (repeatable)
    #[arg(long = "image-url")]
    pub image_urls: Vec<String>,
    /// Local image file to upload and attach (repeatable)
    #[arg(long = "image")]
    pub image_files: Vec<PathBuf>,
    /// Drop existing images before adding new ones (edit only)
    #[arg(long)]
    pub clear_images: bool,
}

impl ProjectForm {
    fn adds_images(&self) -> bool {
        !self.image_urls.is_empty() || !self.image_files.is_empty()
    }
}

pub(crate) fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool>;
}

/// Reads a `y`/`yes` answer from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        eprint!("{prompt} [y/N] ");
        std::io::stderr().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

fn session_store(cli: &Cli) -> FileSessionStore {
    let path = cli
        .session_file
        .clone()
        .or_else(FileSessionStore::default_path)
        .unwrap_or_else(|| PathBuf::from("auth_session.json"));
    FileSessionStore::new(path)
}

struct Runner<'a, S: SessionStore, W: Write> {
    ctx: AuthContext<S>,
    anon: ApiClient,
    out: &'a mut W,
    json: bool,
}

impl<S: SessionStore, W: Write> Runner<'_, S, W> {
    /// Client carrying the session token; fails when signed out.
    fn authed(&self) -> anyhow::Result<ApiClient> {
        let session = self
            .ctx
            .require_session()
            .context("sign in first: folio sign-in --email <email> --password <password>")?;
        Ok(self.anon.clone().with_token(session.token.clone()))
    }

    fn emit<T: Serialize>(&mut self, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            writeln!(self.out, "{}", serde_json::to_string_pretty(value)?)?;
        } else {
            write!(self.out, "{}", text(value))?;
        }
        Ok(())
    }

    async fn upload_files(&self, client: &ApiClient, files: &[PathBuf]) -> anyhow::Result<Vec<String>> {
        let mut urls = Vec::with_capacity(files.len());
        for path in files {
            let body = tokio::fs::read(path)
                .await
                .with_context(|| format!("read {}", path.display()))?;
            let url = client
                .upload_image(body, mime_from_path(path))
                .await
                .with_context(|| format!("failed to upload {}", path.display()))?;
            urls.push(url);
        }
        Ok(urls)
    }

    async fn run(&mut self, command: Commands, confirm: &mut dyn Confirm) -> anyhow::Result<()> {
        match command {
            Commands::Health => {
                let body = self.anon.health().await?;
                self.emit(&body, |b| format!("{}\n", b["status"].as_str().unwrap_or("unknown")))
            }
            Commands::Portfolio => {
                let projects = self.anon.list_projects().await?;
                let profile = Profile::from_env();
                self.emit(&projects, |p| render::render_portfolio(&profile, p))
            }
            Commands::SignUp {
                email,
                password,
                name,
            } => {
                let anon = self.anon.clone();
                let session = self.ctx.sign_up(&anon, &email, &password, &name).await?.clone();
                self.emit(&session.user, |u| format!("Signed up and signed in as {}\n", u.email))
            }
            Commands::SignIn { email, password } => {
                let anon = self.anon.clone();
                let session = self.ctx.sign_in(&anon, &email, &password).await?.clone();
                self.emit(&session.user, |u| format!("Successfully signed in as {}\n", u.email))
            }
            Commands::SignOut => {
                self.ctx.sign_out();
                writeln!(self.out, "Signed out")?;
                Ok(())
            }
            Commands::Account => {
                let user = self.ctx.require_session()?.user.clone();
                self.emit(&user, render::render_account)
            }
            Commands::Dashboard => {
                let client = self.authed()?;
                let user = self.ctx.require_session()?.user.clone();
                let projects = client.list_projects().await?;
                let stats = DashboardStats::from_projects(&projects);
                self.emit(&projects, |_| render::render_dashboard(&user, stats))
            }
            Commands::Upload { file } => {
                let client = self.authed()?;
                let urls = self.upload_files(&client, std::slice::from_ref(&file)).await?;
                self.emit(&urls, |u| format!("{}\n", u.join("\n")))
            }
            Commands::Projects { action } => self.run_projects(action, confirm).await,
        }
    }

    async fn run_projects(&mut self, action: ProjectCommands, confirm: &mut dyn Confirm) -> anyhow::Result<()> {
        let client = self.authed()?;
        match action {
            ProjectCommands::List => {
                let projects = client.list_projects().await?;
                self.emit(&projects, |p| render::render_project_table(p))
            }
            ProjectCommands::Get { id } => {
                let project = client.get_project(&id).await?;
                self.emit(&project, render::render_project)
            }
            ProjectCommands::Create(form) => {
                let mut images = form.image_urls.clone();
                images.extend(self.upload_files(&client, &form.image_files).await?);
                let input = ProjectInput {
                    name: form.name,
                    description: form.description,
                    images: Some(images),
                    github_url: form.github_url,
                    linkedin_url: form.linkedin_url,
                    demo_url: form.demo_url,
                };
                let project = client.create_project(&input).await?;
                self.emit(&project, |p| format!("Project created: {} ({})\n", p.name, p.id))
            }
            ProjectCommands::Edit { id, form } => {
                let images = if form.clear_images || form.adds_images() {
                    let mut images = if form.clear_images {
                        Vec::new()
                    } else {
                        client.get_project(&id).await?.images
                    };
                    images.extend(form.image_urls.iter().cloned());
                    images.extend(self.upload_files(&client, &form.image_files).await?);
                    Some(images)
                } else {
                    None
                };
                let input = ProjectInput {
                    name: form.name,
                    description: form.description,
                    images,
                    github_url: form.github_url,
                    linkedin_url: form.linkedin_url,
                    demo_url: form.demo_url,
                };
                let project = client.update_project(&id, &input).await?;
                self.emit(&project, |p| format!("Project updated: {} ({})\n", p.name, p.id))
            }
            ProjectCommands::Delete { id, yes } => {
                let project: Project = client.get_project(&id).await?;
                let prompt = format!(
                    "Delete project \"{}\"? This action cannot be undone.",
                    project.name
                );
                if !yes && !confirm.confirm(&prompt)? {
                    writeln!(self.out, "Cancelled")?;
                    return Ok(());
                }
                let message = client.delete_project(&id).await?;
                writeln!(self.out, "{message}")?;
                Ok(())
            }
        }
    }
}

/// Run one CLI invocation against the session store named by `cli`.
pub async fn run<W: Write>(cli: Cli, out: &mut W, confirm: &mut dyn Confirm) -> anyhow::Result<()> {
    let store = session_store(&cli);
    run_with_store(cli, store, out, confirm).await
}

pub async fn run_with_store<S: SessionStore, W: Write>(
    cli: Cli,
    store: S,
    out: &mut W,
    confirm: &mut dyn Confirm,
) -> anyhow::Result<()> {
    let mut runner = Runner {
        ctx: AuthContext::load(store),
        anon: ApiClient::new(&cli.server),
        out,
        json: cli.json,
    };
    runner.run(cli.command, confirm).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{session::MemorySessionStore, testing::spawn_server};

    struct Answer(bool, Vec<String>);

    impl Confirm for Answer {
        fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
            self.1.push(prompt.to_string());
            Ok(self.0)
        }
    }

    async fn folio(server: &str, store: &MemorySessionStore, args: &[&str]) -> anyhow::Result<String> {
        folio_answering(server, store, args, &mut Answer(true, vec![])).await
    }

    async fn folio_answering(
        server: &str,
        store: &MemorySessionStore,
        args: &[&str],
        confirm: &mut Answer,
    ) -> anyhow::Result<String> {
        let argv: Vec<&str> = ["folio", "--server", server]
            .into_iter()
            .chain(args.iter().copied())
            .collect();
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        run_with_store(cli, store, &mut out, confirm).await?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn mime_guess_from_extension() {
        assert_eq!(mime_from_path(Path::new("a/b.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("shot.png")), "image/png");
        assert_eq!(mime_from_path(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn dashboard_is_protected() {
        let server = spawn_server().await;
        let store = MemorySessionStore::new();

        let err = folio(&server, &store, &["dashboard"]).await.unwrap_err();
        assert!(err.to_string().contains("sign in first"));

        let err = folio(&server, &store, &["projects", "list"]).await.unwrap_err();
        assert!(err.to_string().contains("sign in first"));
    }

    #[tokio::test]
    async fn sign_in_flow_and_dashboard() {
        let server = spawn_server().await;
        let store = MemorySessionStore::new();

        let out = folio(
            &server,
            &store,
            &["sign-up", "--email", "a@b.com", "--password", "x", "--name", "A"],
        )
        .await
        .unwrap();
        assert!(out.contains("a@b.com"));

        folio(&server, &store, &["sign-out"]).await.unwrap();
        assert!(store.raw().is_none());

        let err = folio(
            &server,
            &store,
            &["sign-in", "--email", "a@b.com", "--password", "nope"],
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");

        folio(
            &server,
            &store,
            &["sign-in", "--email", "a@b.com", "--password", "x"],
        )
        .await
        .unwrap();

        folio(
            &server,
            &store,
            &["projects", "create", "--name", "Folio", "--description", "Site"],
        )
        .await
        .unwrap();

        let out = folio(&server, &store, &["dashboard"]).await.unwrap();
        assert!(out.contains("Total Projects  1"));

        let out = folio(&server, &store, &["account"]).await.unwrap();
        assert!(out.contains("Administrator"));
    }

    #[tokio::test]
    async fn create_with_uploaded_image_then_edit_and_delete() {
        let server = spawn_server().await;
        let store = MemorySessionStore::new();
        folio(
            &server,
            &store,
            &["sign-up", "--email", "a@b.com", "--password", "x", "--name", "A"],
        )
        .await
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("shot.png");
        std::fs::write(&img, b"\x89PNG\r\n").unwrap();

        let out = folio(
            &server,
            &store,
            &[
                "--json",
                "projects",
                "create",
                "--name",
                "Folio",
                "--description",
                "Site",
                "--image-url",
                "https://img/existing.png",
                "--image",
                img.to_str().unwrap(),
            ],
        )
        .await
        .unwrap();
        let created: Project = serde_json::from_str(&out).unwrap();
        assert_eq!(created.images.len(), 2);
        assert_eq!(created.images[0], "https://img/existing.png");
        assert!(created.images[1].contains("Project+Image"));

        let id = created.id.to_string();
        let out = folio(
            &server,
            &store,
            &["--json", "projects", "edit", &id, "--image-url", "https://img/new.png"],
        )
        .await
        .unwrap();
        let edited: Project = serde_json::from_str(&out).unwrap();
        assert_eq!(edited.images.len(), 3);
        assert_eq!(edited.name, "Folio");

        let mut refuse = Answer(false, vec![]);
        let out = folio_answering(&server, &store, &["projects", "delete", &id], &mut refuse)
            .await
            .unwrap();
        assert!(out.contains("Cancelled"));
        assert!(refuse.1[0].contains("\"Folio\""));

        let out = folio(&server, &store, &["projects", "delete", &id, "--yes"])
            .await
            .unwrap();
        assert!(out.contains("Project deleted successfully"));

        let err = folio(&server, &store, &["projects", "get", &id]).await.unwrap_err();
        assert_eq!(err.to_string(), "Project not found");
    }

    #[tokio::test]
    async fn create_without_description_surfaces_server_message() {
        let server = spawn_server().await;
        let store = MemorySessionStore::new();
        folio(
            &server,
            &store,
            &["sign-up", "--email", "a@b.com", "--password", "x", "--name", "A"],
        )
        .await
        .unwrap();

        let err = folio(&server, &store, &["projects", "create", "--name", "Only"])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Name and description are required");
    }

    #[tokio::test]
    async fn portfolio_is_public() {
        let server = spawn_server().await;
        let store = MemorySessionStore::new();
        let out = folio(&server, &store, &["portfolio"]).await.unwrap();
        assert!(out.contains("No projects yet."));
    }
}
