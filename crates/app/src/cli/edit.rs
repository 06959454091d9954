//! Project editing subcommands.

use std::path::PathBuf;

use anyhow::{Context, bail};
use wirepad_application::EditProject;
use wirepad_application::ports::ProjectStore;
use wirepad_domain::{FormField, Header, HttpMethod, Payload, QueryParam, Request, SecurityEntity};

use super::store;
use crate::render;

/// Create an empty project file
#[derive(Debug, clap::Args)]
pub struct New {
    /// Project file to create
    pub file: PathBuf,

    /// Project name; defaults to the file stem
    #[arg(short, long)]
    pub label: Option<String>,

    /// Replace an existing file
    #[arg(long)]
    pub force: bool,
}

impl New {
    pub(super) async fn run(self) -> anyhow::Result<()> {
        if self.file.exists() && !self.force {
            bail!("{} already exists (use --force to replace it)", self.file.display());
        }
        let label = self.label.unwrap_or_else(|| {
            self.file
                .file_stem()
                .map_or_else(|| "Untitled".to_string(), |s| s.to_string_lossy().into_owned())
        });
        let project = EditProject::new(store()).create(&self.file, &label).await?;
        println!("Created project '{}' in {}", project.label, self.file.display());
        Ok(())
    }
}

/// Show the sections and requests of a project
#[derive(Debug, clap::Args)]
pub struct Tree {
    /// Project file
    pub file: PathBuf,

    /// Show ids next to every entry
    #[arg(long)]
    pub ids: bool,
}

impl Tree {
    pub(super) async fn run(self) -> anyhow::Result<()> {
        let project = store()
            .load(&self.file)
            .await
            .with_context(|| format!("Failed to open {}", self.file.display()))?;
        print!("{}", render::tree(&project, self.ids));
        Ok(())
    }
}

/// Add a section to a project
#[derive(Debug, clap::Args)]
pub struct AddSection {
    /// Project file
    pub file: PathBuf,

    /// Section name
    pub label: String,

    /// Parent section id or `Section/Sub` label path; top level when absent
    #[arg(short, long)]
    pub parent: Option<String>,
}

impl AddSection {
    pub(super) async fn run(self) -> anyhow::Result<()> {
        let id = EditProject::new(store())
            .add_section(&self.file, self.parent.as_deref(), &self.label)
            .await?;
        println!("Added section '{}' ({id})", self.label);
        Ok(())
    }
}

/// Add a request to a section
#[derive(Debug, clap::Args)]
pub struct AddRequest {
    /// Project file
    pub file: PathBuf,

    /// Target section id or `Section/Sub` label path
    pub section: String,

    /// Request name
    pub label: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET", value_parser = parse_method)]
    pub method: HttpMethod,

    /// Request URL, may contain `<<variable>>` tokens
    #[arg(short, long, default_value = "")]
    pub url: String,

    /// Header as `Name: value`; repeatable
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<Header>,

    /// Query parameter as `name=value`; repeatable
    #[arg(short, long = "query", value_parser = parse_query)]
    pub query: Vec<QueryParam>,

    /// JSON body
    #[arg(long, conflicts_with_all = ["text", "body_file", "form"])]
    pub json: Option<String>,

    /// Plain text body
    #[arg(long, conflicts_with_all = ["body_file", "form"])]
    pub text: Option<String>,

    /// Send this file as the body
    #[arg(long, value_name = "PATH", conflicts_with = "form")]
    pub body_file: Option<String>,

    /// URL-encoded form field as `name=value`; repeatable
    #[arg(long, value_parser = parse_form_field)]
    pub form: Vec<FormField>,

    /// Bearer token for this request
    #[arg(long, conflicts_with = "no_auth")]
    pub bearer: Option<String>,

    /// Send without authorization instead of inheriting it
    #[arg(long)]
    pub no_auth: bool,
}

impl AddRequest {
    fn into_request(self) -> Request {
        let payload = if let Some(json) = self.json {
            Payload::json(json)
        } else if let Some(text) = self.text {
            Payload::text(text)
        } else if let Some(path) = self.body_file {
            Payload::file(path)
        } else if !self.form.is_empty() {
            Payload::url_encoded(self.form)
        } else {
            Payload::None
        };
        let security = match (self.bearer, self.no_auth) {
            (Some(token), _) => SecurityEntity::bearer(token),
            (None, true) => SecurityEntity::None,
            (None, false) => SecurityEntity::Inherit,
        };

        let mut request = Request::new(self.label)
            .with_method(self.method)
            .with_url(self.url)
            .with_security(security)
            .with_payload(payload);
        request.headers = self.headers;
        request.query = self.query;
        request
    }

    pub(super) async fn run(self) -> anyhow::Result<()> {
        let file = self.file.clone();
        let section = self.section.clone();
        let request = self.into_request();
        let label = request.label.clone();
        let id = EditProject::new(store())
            .add_request(&file, &section, request)
            .await?;
        println!("Added request '{label}' ({id})");
        Ok(())
    }
}

/// Duplicate a section or request next to the original
#[derive(Debug, clap::Args)]
pub struct Duplicate {
    /// Project file
    pub file: PathBuf,

    /// Id of the section or request to copy
    pub id: String,
}

impl Duplicate {
    pub(super) async fn run(self) -> anyhow::Result<()> {
        let copy = EditProject::new(store()).duplicate(&self.file, &self.id).await?;
        println!("Duplicated {} as {copy}", self.id);
        Ok(())
    }
}

/// Remove a section or request
#[derive(Debug, clap::Args)]
pub struct Remove {
    /// Project file
    pub file: PathBuf,

    /// Id of the section or request to remove
    pub id: String,
}

impl Remove {
    pub(super) async fn run(self) -> anyhow::Result<()> {
        EditProject::new(store()).remove(&self.file, &self.id).await?;
        println!("Removed {}", self.id);
        Ok(())
    }
}

fn parse_method(s: &str) -> Result<HttpMethod, String> {
    s.parse().map_err(|e| {
        let known: Vec<&str> = HttpMethod::all().iter().map(|m| m.as_str()).collect();
        format!("{e} (expected one of {})", known.join(", "))
    })
}

fn parse_header(s: &str) -> Result<Header, String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got `{s}`"))?;
    if name.trim().is_empty() {
        return Err("header name is empty".to_string());
    }
    Ok(Header::new(name.trim(), value.trim()))
}

fn parse_pair(s: &str) -> Result<(&str, &str), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `name=value`, got `{s}`"))?;
    if name.trim().is_empty() {
        return Err("name is empty".to_string());
    }
    Ok((name.trim(), value))
}

fn parse_query(s: &str) -> Result<QueryParam, String> {
    parse_pair(s).map(|(name, value)| QueryParam::new(name, value))
}

fn parse_form_field(s: &str) -> Result<FormField, String> {
    parse_pair(s).map(|(name, value)| FormField::text(name, value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept: application/json").unwrap(),
            Header::new("Accept", "application/json")
        );
        assert_eq!(
            parse_header("X-Time: 10:30").unwrap(),
            Header::new("X-Time", "10:30")
        );
        assert!(parse_header("no colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_parse_query_keeps_value_verbatim() {
        assert_eq!(parse_query("q=a=b").unwrap(), QueryParam::new("q", "a=b"));
        assert!(parse_query("novalue").is_err());
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("post").unwrap(), HttpMethod::Post);
        assert!(parse_method("FETCH").is_err());
    }
}
