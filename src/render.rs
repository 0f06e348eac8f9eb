//! Plain-text views: the public portfolio, the dashboard overview, the admin
//! project table and the account page.

use std::fmt;

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{auth::dto::PublicUser, projects::Project};

/// Owner details shown on the public portfolio.
#[derive(Debug, Clone)]
pub struct Profile {
    pub owner: String,
    pub headline: String,
    pub about: String,
    pub contact_email: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            owner: "Portfolio".into(),
            headline: "Software Engineer".into(),
            about: "I build backend systems and web applications.".into(),
            contact_email: None,
        }
    }
}

impl Profile {
    /// `FOLIO_OWNER`, `FOLIO_HEADLINE`, `FOLIO_ABOUT`, `FOLIO_CONTACT`; defaults otherwise.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            owner: std::env::var("FOLIO_OWNER").unwrap_or(d.owner),
            headline: std::env::var("FOLIO_HEADLINE").unwrap_or(d.headline),
            about: std::env::var("FOLIO_ABOUT").unwrap_or(d.about),
            contact_email: std::env::var("FOLIO_CONTACT").ok().or(d.contact_email),
        }
    }
}

/// Overview numbers. All three are the project count: every stored project
/// counts as active and published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub published: usize,
}

impl DashboardStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        let n = projects.len();
        Self {
            total: n,
            active: n,
            published: n,
        }
    }
}

fn links(p: &Project) -> Vec<(&'static str, &str)> {
    [
        ("GitHub", p.github_url.as_str()),
        ("LinkedIn", p.linkedin_url.as_str()),
        ("Demo", p.demo_url.as_str()),
    ]
    .into_iter()
    .filter(|(_, url)| !url.is_empty())
    .collect()
}

fn short_date(t: OffsetDateTime) -> String {
    t.date().to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Public portfolio page.
pub struct PortfolioView<'a> {
    pub profile: &'a Profile,
    pub projects: &'a [Project],
}

impl fmt::Display for PortfolioView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.profile;
        writeln!(f, "{}", profile.owner)?;
        writeln!(f, "{}", profile.headline)?;
        writeln!(f)?;

        writeln!(f, "Projects")?;
        writeln!(f, "--------")?;
        if self.projects.is_empty() {
            writeln!(f, "No projects yet.")?;
        }
        for p in self.projects {
            writeln!(f, "* {}", p.name)?;
            writeln!(f, "  {}", p.description)?;
            let links = links(p);
            if !links.is_empty() {
                let joined: Vec<String> = links.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                writeln!(f, "  {}", joined.join(" | "))?;
            }
            if !p.images.is_empty() {
                writeln!(f, "  {} image(s)", p.images.len())?;
            }
        }
        writeln!(f)?;

        writeln!(f, "About")?;
        writeln!(f, "-----")?;
        writeln!(f, "{}", profile.about)?;
        if let Some(email) = &profile.contact_email {
            writeln!(f)?;
            writeln!(f, "Contact: {email}")?;
        }
        Ok(())
    }
}

pub struct DashboardView<'a> {
    pub user: &'a PublicUser,
    pub stats: DashboardStats,
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dashboard")?;
        writeln!(
            f,
            "Welcome back, {}! Here's your portfolio overview.",
            self.user.name
        )?;
        writeln!(f)?;
        writeln!(f, "  Total Projects  {}", self.stats.total)?;
        writeln!(f, "  Active          {}", self.stats.active)?;
        writeln!(f, "  Published       {}", self.stats.published)
    }
}

/// Admin listing, one row per project.
pub struct ProjectTable<'a>(pub &'a [Project]);

impl fmt::Display for ProjectTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No projects yet. Create one with `folio projects create`.");
        }

        writeln!(f, "{:<36}  {:<28}  {:>6}  {:<10}", "ID", "NAME", "IMAGES", "UPDATED")?;
        for p in self.0 {
            writeln!(
                f,
                "{:<36}  {:<28}  {:>6}  {:<10}",
                p.id,
                truncate(&p.name, 28),
                p.images.len(),
                short_date(p.updated_at)
            )?;
        }
        Ok(())
    }
}

pub struct ProjectDetail<'a>(pub &'a Project);

impl fmt::Display for ProjectDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        writeln!(f, "{}", p.name)?;
        writeln!(f, "id:          {}", p.id)?;
        writeln!(f, "description: {}", p.description)?;
        for (label, url) in links(p) {
            writeln!(f, "{:<13}{}", format!("{}:", label.to_lowercase()), url)?;
        }
        for (i, img) in p.images.iter().enumerate() {
            writeln!(f, "image {}:     {}", i + 1, img)?;
        }
        let created = p.created_at.format(&Rfc3339).map_err(|_| fmt::Error)?;
        let updated = p.updated_at.format(&Rfc3339).map_err(|_| fmt::Error)?;
        writeln!(f, "created:     {created}")?;
        writeln!(f, "updated:     {updated}")
    }
}

pub struct AccountView<'a>(pub &'a PublicUser);

impl fmt::Display for AccountView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account Information")?;
        writeln!(f, "  Email    {}", self.0.email)?;
        writeln!(f, "  Name     {}", self.0.name)?;
        writeln!(f, "  Role     Administrator")?;
        writeln!(f, "  User ID  {}", self.0.id)
    }
}

pub fn render_portfolio(profile: &Profile, projects: &[Project]) -> String {
    PortfolioView { profile, projects }.to_string()
}

pub fn render_dashboard(user: &PublicUser, stats: DashboardStats) -> String {
    DashboardView { user, stats }.to_string()
}

pub fn render_project_table(projects: &[Project]) -> String {
    ProjectTable(projects).to_string()
}

pub fn render_project(p: &Project) -> String {
    ProjectDetail(p).to_string()
}

pub fn render_account(user: &PublicUser) -> String {
    AccountView(user).to_string()
}
