//! Postman to Wirepad Mapper
//!
//! Maps parsed Postman types onto the domain tree. Nothing here fails: every
//! lossy decision is recorded as an [`ImportWarning`] and mapping continues.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use wirepad_domain::{
    ApiKeyLocation, FormField, Header, HttpMethod, Payload, Project, QueryParam, Request,
    SecurityEntity, Section, Variable, normalize_key,
};

use super::environment_types::PostmanEnvironment;
use super::types::{
    PostmanAuth, PostmanBody, PostmanCollection, PostmanDescription, PostmanFormParam,
    PostmanHeaders, PostmanItem, PostmanRequestDef, PostmanUrl, has_scripts,
};
use super::warning::ImportWarning;

#[allow(clippy::expect_used)]
static POSTMAN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("valid regex"));

/// Rewrites `{{name}}` tokens to `<<name>>`.
#[must_use]
pub fn convert_tokens(text: &str) -> String {
    POSTMAN_TOKEN.replace_all(text, "<<${1}>>").into_owned()
}

/// Walks a collection or environment, accumulating warnings.
pub struct Mapper {
    max_depth: usize,
    warnings: Vec<ImportWarning>,
}

impl Mapper {
    /// Folders nested deeper than `max_depth` are flattened into their parent.
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            warnings: Vec::new(),
        }
    }

    /// Maps a collection to a project with a single root section.
    #[must_use]
    pub fn map_collection(
        mut self,
        collection: &PostmanCollection,
    ) -> (Project, Vec<ImportWarning>) {
        let label = label_or(&collection.info.name, "Imported Collection");
        let path = label.clone();

        let mut root = Section::new(label.clone());
        root.notes = notes(collection.info.description.as_ref());
        root.variables = self.map_variables(
            &path,
            collection
                .variable
                .iter()
                .map(|v| (v.name(), v.value_text(), v.disabled)),
        );
        if let Some(auth) = &collection.auth {
            root.security = self.map_auth(auth, &path);
        }
        if has_scripts(&collection.event) {
            self.scripts_skipped(&path);
        }

        for item in &collection.item {
            self.map_item(item, &mut root, &path, 0);
        }

        let mut project = Project::new(label);
        project.notes = root.notes.clone();
        (project.with_section(root), self.warnings)
    }

    /// Maps an environment to a section that only holds variables.
    #[must_use]
    pub fn map_environment(
        mut self,
        environment: &PostmanEnvironment,
    ) -> (Section, Vec<ImportWarning>) {
        let label = label_or(&environment.name, "Imported Environment");
        let mut section = Section::new(label.clone());
        section.variables = self.map_variables(
            &label,
            environment
                .values
                .iter()
                .map(|v| (v.key.as_str(), v.value_text(), !v.enabled)),
        );
        (section, self.warnings)
    }

    fn map_item(
        &mut self,
        item: &PostmanItem,
        parent: &mut Section,
        parent_path: &str,
        depth: usize,
    ) {
        let name = label_or(&item.name, "Untitled");
        let path = format!("{parent_path}/{name}");

        if item.has_scripts() {
            self.scripts_skipped(&path);
        }

        match (&item.item, &item.request) {
            (Some(children), request) => {
                if request.is_some() {
                    self.warn(
                        &path,
                        "item has both sub-items and a request; the request was skipped",
                    );
                }
                if depth >= self.max_depth {
                    self.warn(
                        &path,
                        format!(
                            "folder nested deeper than {} levels was flattened into its parent",
                            self.max_depth
                        ),
                    );
                    for child in children {
                        self.map_item(child, parent, &path, depth);
                    }
                    return;
                }

                let mut section = Section::new(name);
                section.notes = notes(item.description.as_ref());
                section.variables = self.map_variables(
                    &path,
                    item.variable
                        .iter()
                        .map(|v| (v.name(), v.value_text(), v.disabled)),
                );
                if let Some(auth) = &item.auth {
                    section.security = self.map_auth(auth, &path);
                }
                for child in children {
                    self.map_item(child, &mut section, &path, depth + 1);
                }
                parent.sections.push(section);
            }
            (None, Some(definition)) => {
                let request = self.map_request(item, name, definition, &path);
                parent.requests.push(request);
            }
            (None, None) => {
                self.warn(&path, "item is neither a folder nor a request and was skipped");
            }
        }
    }

    fn map_request(
        &mut self,
        item: &PostmanItem,
        name: String,
        definition: &PostmanRequestDef,
        path: &str,
    ) -> Request {
        let mut request = Request::new(name);
        request.notes = notes(item.description.as_ref());

        let full = match definition {
            PostmanRequestDef::Url(url) => return request.with_url(convert_tokens(url.trim())),
            PostmanRequestDef::Full(full) => full,
        };

        request.method = full.method.parse().unwrap_or_else(|_| {
            self.error(
                path,
                format!("unsupported method '{}', imported as GET", full.method),
            );
            HttpMethod::Get
        });
        if request.notes.is_empty() {
            request.notes = notes(full.description.as_ref());
        }

        let (url, query) = map_url(&full.url);
        request.url = url;
        request.query = query;
        request.headers = self.map_headers(&full.header, path);
        if let Some(auth) = &full.auth {
            request.security = self.map_auth(auth, path);
        }
        if let Some(body) = &full.body {
            request.payload = self.map_body(body, &request.headers, path);
        }
        request
    }

    fn map_headers(&mut self, headers: &PostmanHeaders, path: &str) -> Vec<Header> {
        match headers {
            PostmanHeaders::List(list) => list
                .iter()
                .filter_map(|h| {
                    if h.key.trim().is_empty() {
                        self.warn(path, "header without a name was skipped");
                        return None;
                    }
                    Some(Header {
                        label: convert_tokens(h.key.trim()),
                        value: convert_tokens(h.value.as_deref().unwrap_or_default()),
                        disabled: h.disabled,
                    })
                })
                .collect(),
            PostmanHeaders::Raw(raw) => raw
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .filter_map(|line| {
                    let (disabled, line) = line
                        .strip_prefix("//")
                        .map_or((false, line), |rest| (true, rest.trim_start()));
                    match line.split_once(':') {
                        Some((key, value)) if !key.trim().is_empty() => Some(Header {
                            label: convert_tokens(key.trim()),
                            value: convert_tokens(value.trim()),
                            disabled,
                        }),
                        _ => {
                            self.warn(path, format!("malformed header line '{line}' was skipped"));
                            None
                        }
                    }
                })
                .collect(),
        }
    }

    fn map_auth(&mut self, auth: &PostmanAuth, path: &str) -> SecurityEntity {
        match auth.auth_type.trim().to_ascii_lowercase().as_str() {
            "inherit" => SecurityEntity::Inherit,
            "noauth" | "" => SecurityEntity::None,
            "bearer" => SecurityEntity::Bearer {
                token: self.auth_field(auth, "token", path, "bearer token"),
            },
            "basic" => SecurityEntity::Basic {
                username: self.auth_field(auth, "username", path, "basic auth username"),
                password: self.auth_field(auth, "password", path, "basic auth password"),
            },
            "apikey" => {
                let key = self.auth_field(auth, "key", path, "API key name");
                let value = self.auth_field(auth, "value", path, "API key value");
                let location = match auth.get_param("in").as_deref().map(str::trim) {
                    Some("query") => ApiKeyLocation::Query,
                    Some("header") => ApiKeyLocation::Header,
                    Some(other) => {
                        self.warn(
                            path,
                            format!("unknown API key location '{other}', using header"),
                        );
                        ApiKeyLocation::Header
                    }
                    None => {
                        self.warn(path, "missing API key location, using header");
                        ApiKeyLocation::Header
                    }
                };
                SecurityEntity::ApiKey {
                    key,
                    value,
                    location,
                }
            }
            other => {
                self.error(
                    path,
                    format!("unsupported auth type '{other}' was replaced by no auth"),
                );
                SecurityEntity::None
            }
        }
    }

    fn auth_field(&mut self, auth: &PostmanAuth, key: &str, path: &str, what: &str) -> String {
        auth.get_param(key).map_or_else(
            || {
                self.warn(path, format!("missing {what}, left empty"));
                String::new()
            },
            |value| convert_tokens(&value),
        )
    }

    fn map_body(&mut self, body: &PostmanBody, headers: &[Header], path: &str) -> Payload {
        if body.disabled {
            self.info(path, "disabled body was skipped");
            return Payload::None;
        }

        let has_raw = body.raw.as_deref().is_some_and(|r| !r.is_empty());
        let mode = match body.mode.as_deref().map(str::trim) {
            Some(mode) if !mode.is_empty() => mode,
            _ if has_raw => "raw",
            // `"body": {}` is common in v2.0 exports of GET requests
            _ => return Payload::None,
        };

        match mode {
            "raw" => self.map_raw_body(body, headers, path),
            "urlencoded" => {
                Payload::url_encoded(self.map_form_fields(&body.urlencoded, false, path))
            }
            "formdata" => Payload::multipart(self.map_form_fields(&body.formdata, true, path)),
            "file" => match body.file.as_ref().and_then(|f| f.src.as_deref()) {
                Some(src) if !src.trim().is_empty() => Payload::file(convert_tokens(src.trim())),
                _ => {
                    self.warn(path, "file body without a source path was skipped");
                    Payload::None
                }
            },
            other => {
                self.error(path, format!("unsupported body mode '{other}' was dropped"));
                Payload::None
            }
        }
    }

    fn map_raw_body(&mut self, body: &PostmanBody, headers: &[Header], path: &str) -> Payload {
        let raw = body.raw.as_deref().unwrap_or_default();
        if raw.is_empty() {
            return Payload::None;
        }

        let declared = headers
            .iter()
            .find(|h| !h.disabled && h.is_named("Content-Type"))
            .map(|h| h.value.clone());

        let content_type = match body.raw_language() {
            Some(language) => match language.trim().to_ascii_lowercase().as_str() {
                "json" => "application/json".to_string(),
                // "text" also covers csv, yaml and other plain formats
                "text" => declared.unwrap_or_else(|| "text/plain".to_string()),
                "xml" => "application/xml".to_string(),
                "html" => "text/html".to_string(),
                "javascript" => "application/javascript".to_string(),
                other => {
                    self.error(
                        path,
                        format!("unsupported raw language '{other}', body was dropped"),
                    );
                    return Payload::None;
                }
            },
            None => declared.unwrap_or_else(|| sniff_content_type(raw).to_string()),
        };

        Payload::Text {
            content: convert_tokens(raw),
            content_type,
        }
    }

    fn map_form_fields(
        &mut self,
        params: &[PostmanFormParam],
        allow_files: bool,
        path: &str,
    ) -> Vec<FormField> {
        params
            .iter()
            .filter_map(|p| {
                if p.key.trim().is_empty() {
                    self.warn(path, "form field without a name was skipped");
                    return None;
                }
                let label = convert_tokens(p.key.trim());
                let mut field = if allow_files && p.is_file() {
                    let src = p.first_src().unwrap_or_else(|| {
                        self.warn(path, format!("file field '{label}' has no source path"));
                        String::new()
                    });
                    FormField::file(label, convert_tokens(&src))
                } else {
                    FormField::text(label, convert_tokens(p.value.as_deref().unwrap_or_default()))
                };
                field.disabled = p.disabled;
                Some(field)
            })
            .collect()
    }

    fn map_variables<'a>(
        &mut self,
        path: &str,
        entries: impl IntoIterator<Item = (&'a str, String, bool)>,
    ) -> Vec<Variable> {
        let mut seen = HashSet::new();
        let mut variables = Vec::new();
        for (raw, value, disabled) in entries {
            let Some(token) = normalize_key(raw) else {
                self.warn(path, format!("invalid variable name '{raw}' was skipped"));
                continue;
            };
            if !seen.insert(token.clone()) {
                self.warn(
                    path,
                    format!(
                        "duplicate variable '{}' ignored; the first definition is kept",
                        raw.trim()
                    ),
                );
                continue;
            }
            let name = token
                .trim_start_matches("<<")
                .trim_end_matches(">>")
                .to_string();
            variables.push(Variable {
                key: name,
                disabled,
                value: convert_tokens(&value),
            });
        }
        variables
    }

    fn scripts_skipped(&mut self, path: &str) {
        self.info(path, "scripts are not supported and were skipped");
    }

    fn info(&mut self, path: &str, message: impl Into<String>) {
        self.push(ImportWarning::info(path, message));
    }

    fn warn(&mut self, path: &str, message: impl Into<String>) {
        self.push(ImportWarning::warning(path, message));
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.push(ImportWarning::error(path, message));
    }

    fn push(&mut self, warning: ImportWarning) {
        debug!(%warning, "import issue");
        self.warnings.push(warning);
    }
}

/// Splits a Postman URL into the request URL and its query rows.
///
/// When the URL carries structured query rows, the query part of `raw` is
/// dropped so the parameters are not sent twice.
fn map_url(url: &PostmanUrl) -> (String, Vec<QueryParam>) {
    let raw = url.raw();
    let params = url.query_params();
    if params.is_empty() {
        return (convert_tokens(raw.trim()), Vec::new());
    }

    let base = raw.split_once('?').map_or(raw.as_str(), |(base, _)| base);
    let query = params
        .iter()
        .filter_map(|p| {
            let key = p.key.as_deref()?;
            Some(QueryParam {
                label: convert_tokens(key),
                value: convert_tokens(p.value.as_deref().unwrap_or_default()),
                disabled: p.disabled,
            })
        })
        .collect();
    (convert_tokens(base.trim()), query)
}

fn sniff_content_type(raw: &str) -> &'static str {
    if serde_json::from_str::<serde_json::Value>(raw).is_ok() {
        "application/json"
    } else {
        "text/plain"
    }
}

fn notes(description: Option<&PostmanDescription>) -> String {
    description
        .map(|d| convert_tokens(d.text()))
        .unwrap_or_default()
}

fn label_or(name: &str, fallback: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}
