//! Postman Collection v2.1 exporter.
//!
//! Sections become folders, `<<name>>` tokens become `{{name}}` and disabled
//! rows stay disabled. A project with a single top-level section is written
//! as that section, so the importer maps the file back onto the same tree.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::info;
use wirepad_domain::{
    ApiKeyLocation, FormEncoding, FormField, Header, Payload, Project, QueryParam, Request,
    SecurityEntity, Section, Variable,
};

use super::ExportError;
use crate::import::postman::types::{
    PostmanAuth, PostmanBody, PostmanBodyFile, PostmanBodyOptions, PostmanCollection,
    PostmanDescription, PostmanFormParam, PostmanHeader, PostmanHeaders, PostmanInfo,
    PostmanItem, PostmanQueryParam, PostmanRawOptions, PostmanRequest, PostmanRequestDef,
    PostmanUrl, PostmanUrlStructured, PostmanVariable,
};
use crate::import::postman::{ImportWarning, WarningStats};

/// Schema URL written into `info.schema`
pub const SCHEMA_V21: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

#[allow(clippy::expect_used)]
static WIREPAD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<([A-Za-z0-9_.\-]+)>>").expect("valid regex"));

/// Rewrites `<<name>>` tokens to `{{name}}`.
#[must_use]
pub fn to_postman_tokens(text: &str) -> String {
    WIREPAD_TOKEN.replace_all(text, "{{${1}}}").into_owned()
}

/// Options for [`PostmanExporter::export`]
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Indent the JSON output
    pub pretty_print: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty_print: true }
    }
}

/// Exported collection plus what could not be carried over cleanly
#[derive(Debug)]
pub struct ExportReport {
    /// Collection JSON
    pub content: String,
    /// Things the reader of the collection should know about
    pub warnings: Vec<ImportWarning>,
    /// Per-severity counts of `warnings`
    pub stats: WarningStats,
}

/// Postman Collection v2.1 exporter.
pub struct PostmanExporter;

impl PostmanExporter {
    /// Export a project to Postman Collection v2.1 JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Serialization`] if the collection cannot be
    /// rendered as JSON.
    pub fn export(project: &Project, options: &ExportOptions) -> Result<ExportReport, ExportError> {
        let (collection, warnings) = Self::to_collection(project);

        let content = if options.pretty_print {
            serde_json::to_string_pretty(&collection)
        } else {
            serde_json::to_string(&collection)
        }
        .map_err(|e| ExportError::Serialization(e.to_string()))?;

        let stats = WarningStats::from_warnings(&warnings);
        info!(
            project = %project.label,
            requests = project.request_count(),
            warnings = stats.warning_count,
            "Postman export finished"
        );
        Ok(ExportReport {
            content,
            warnings,
            stats,
        })
    }

    /// Build the collection without serializing it.
    #[must_use]
    pub fn to_collection(project: &Project) -> (PostmanCollection, Vec<ImportWarning>) {
        let mut warnings = Vec::new();

        let (info, variable, auth, item) = match project.sections.as_slice() {
            [root] => {
                let path = root.label.clone();
                (
                    info(project, &root.label, &root.notes),
                    variables(&root.variables),
                    auth(&root.security),
                    items(root, &path, &mut warnings),
                )
            }
            sections => (
                info(project, &project.label, &project.notes),
                Vec::new(),
                None,
                sections
                    .iter()
                    .map(|s| folder(s, &project.label, &mut warnings))
                    .collect(),
            ),
        };

        let collection = PostmanCollection {
            info,
            item,
            variable,
            auth,
            event: Vec::new(),
        };
        (collection, warnings)
    }
}

fn info(project: &Project, name: &str, notes: &str) -> PostmanInfo {
    PostmanInfo {
        name: name.to_string(),
        postman_id: Some(project.id.clone()),
        description: description(notes),
        schema: Some(SCHEMA_V21.to_string()),
    }
}

fn items(section: &Section, path: &str, warnings: &mut Vec<ImportWarning>) -> Vec<PostmanItem> {
    let folders = section.sections.iter().map(|s| folder(s, path, warnings)).collect::<Vec<_>>();
    let requests = section
        .requests
        .iter()
        .map(|r| request_item(r, &format!("{path}/{}", r.label), warnings));
    folders.into_iter().chain(requests).collect()
}

fn folder(section: &Section, parent_path: &str, warnings: &mut Vec<ImportWarning>) -> PostmanItem {
    let path = format!("{parent_path}/{}", section.label);
    PostmanItem {
        name: section.label.clone(),
        description: description(&section.notes),
        item: Some(items(section, &path, warnings)),
        auth: auth(&section.security),
        variable: variables(&section.variables),
        ..PostmanItem::default()
    }
}

fn request_item(request: &Request, path: &str, warnings: &mut Vec<ImportWarning>) -> PostmanItem {
    let mut headers: Vec<PostmanHeader> = request.headers.iter().map(header).collect();
    let body = body(&request.payload, &request.headers, &mut headers, path, warnings);

    let full = PostmanRequest {
        method: request.method.as_str().to_string(),
        url: url(&request.url, &request.query),
        header: PostmanHeaders::List(headers),
        body,
        auth: auth(&request.security),
        description: None,
    };

    PostmanItem {
        name: request.label.clone(),
        description: description(&request.notes),
        request: Some(PostmanRequestDef::Full(Box::new(full))),
        ..PostmanItem::default()
    }
}

fn url(base: &str, query: &[QueryParam]) -> PostmanUrl {
    let base = to_postman_tokens(base.trim());
    if query.is_empty() {
        return PostmanUrl::Simple(base);
    }

    let params: Vec<PostmanQueryParam> = query
        .iter()
        .map(|q| PostmanQueryParam {
            key: Some(to_postman_tokens(&q.label)),
            value: Some(to_postman_tokens(&q.value)),
            description: None,
            disabled: q.disabled,
        })
        .collect();
    let enabled: Vec<String> = params
        .iter()
        .filter(|p| !p.disabled)
        .map(|p| {
            format!(
                "{}={}",
                p.key.as_deref().unwrap_or_default(),
                p.value.as_deref().unwrap_or_default()
            )
        })
        .collect();
    let raw = if enabled.is_empty() {
        base
    } else {
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}{}", enabled.join("&"))
    };

    PostmanUrl::Structured(PostmanUrlStructured {
        raw: Some(raw),
        query: params,
        ..PostmanUrlStructured::default()
    })
}

fn header(header: &Header) -> PostmanHeader {
    PostmanHeader {
        key: to_postman_tokens(&header.label),
        value: Some(to_postman_tokens(&header.value)),
        description: None,
        disabled: header.disabled,
    }
}

fn auth(security: &SecurityEntity) -> Option<PostmanAuth> {
    let auth = match security {
        SecurityEntity::Inherit => return None,
        SecurityEntity::None => PostmanAuth::new("noauth", &[]),
        SecurityEntity::Bearer { token } => {
            PostmanAuth::new("bearer", &[("token", &to_postman_tokens(token))])
        }
        SecurityEntity::Basic { username, password } => PostmanAuth::new(
            "basic",
            &[
                ("username", &to_postman_tokens(username)),
                ("password", &to_postman_tokens(password)),
            ],
        ),
        SecurityEntity::ApiKey {
            key,
            value,
            location,
        } => PostmanAuth::new(
            "apikey",
            &[
                ("key", &to_postman_tokens(key)),
                ("value", &to_postman_tokens(value)),
                (
                    "in",
                    match location {
                        ApiKeyLocation::Header => "header",
                        ApiKeyLocation::Query => "query",
                    },
                ),
            ],
        ),
    };
    Some(auth)
}

fn body(
    payload: &Payload,
    request_headers: &[Header],
    headers: &mut Vec<PostmanHeader>,
    path: &str,
    warnings: &mut Vec<ImportWarning>,
) -> Option<PostmanBody> {
    let body = match payload {
        Payload::None => return None,
        Payload::Text {
            content,
            content_type,
        } => {
            let language = raw_language(content_type);
            let has_header = request_headers.iter().any(|h| h.is_named("Content-Type"));
            if language == "text" && content_type != "text/plain" && !has_header {
                headers.push(PostmanHeader {
                    key: "Content-Type".to_string(),
                    value: Some(content_type.clone()),
                    description: None,
                    disabled: false,
                });
            }
            PostmanBody {
                mode: Some("raw".to_string()),
                raw: Some(to_postman_tokens(content)),
                options: Some(PostmanBodyOptions {
                    raw: Some(PostmanRawOptions {
                        language: Some(language.to_string()),
                    }),
                }),
                ..PostmanBody::default()
            }
        }
        Payload::File { path: file, .. } => {
            warnings.push(ImportWarning::warning(
                path,
                format!("file payload exported by path '{file}'; the file itself is not embedded"),
            ));
            PostmanBody {
                mode: Some("file".to_string()),
                file: Some(PostmanBodyFile {
                    src: Some(to_postman_tokens(file)),
                }),
                ..PostmanBody::default()
            }
        }
        Payload::Form {
            encoding: FormEncoding::UrlEncoded,
            fields,
        } => PostmanBody {
            mode: Some("urlencoded".to_string()),
            urlencoded: fields.iter().map(form_param).collect(),
            ..PostmanBody::default()
        },
        Payload::Form {
            encoding: FormEncoding::Multipart,
            fields,
        } => {
            for field in fields.iter().filter(|f| f.is_file) {
                warnings.push(ImportWarning::warning(
                    path,
                    format!(
                        "file field '{}' exported by path '{}'; the file itself is not embedded",
                        field.label, field.value
                    ),
                ));
            }
            PostmanBody {
                mode: Some("formdata".to_string()),
                formdata: fields.iter().map(form_param).collect(),
                ..PostmanBody::default()
            }
        }
    };
    Some(body)
}

fn form_param(field: &FormField) -> PostmanFormParam {
    let value = to_postman_tokens(&field.value);
    let (value, src, param_type) = if field.is_file {
        (None, Some(Value::String(value)), "file")
    } else {
        (Some(value), None, "text")
    };
    PostmanFormParam {
        key: to_postman_tokens(&field.label),
        value,
        src,
        param_type: Some(param_type.to_string()),
        disabled: field.disabled,
    }
}

fn raw_language(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "application/json" => "json",
        "application/xml" | "text/xml" => "xml",
        "text/html" => "html",
        "application/javascript" | "text/javascript" => "javascript",
        _ if essence.ends_with("+json") => "json",
        _ if essence.ends_with("+xml") => "xml",
        _ => "text",
    }
}

fn variables(variables: &[Variable]) -> Vec<PostmanVariable> {
    variables
        .iter()
        .map(|v| PostmanVariable {
            key: Some(
                v.key
                    .trim()
                    .trim_start_matches("<<")
                    .trim_end_matches(">>")
                    .to_string(),
            ),
            id: None,
            value: Some(Value::String(to_postman_tokens(&v.value))),
            var_type: Some("string".to_string()),
            disabled: v.disabled,
        })
        .collect()
}

fn description(notes: &str) -> Option<PostmanDescription> {
    (!notes.is_empty()).then(|| PostmanDescription::Text(to_postman_tokens(notes)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::import::postman::PostmanImporter;
    use pretty_assertions::assert_eq;
    use wirepad_domain::HttpMethod;

    fn sample() -> Project {
        let list = Request::get("List", "<<base>>/pets")
            .with_query("limit", "10")
            .with_header("Accept", "application/json");
        let mut list = list;
        list.headers.push(Header::disabled("X-Debug", "1"));

        let create = Request::new("Create")
            .with_method(HttpMethod::Post)
            .with_url("<<base>>/pets")
            .with_payload(Payload::json(r#"{"name": "<<pet>>"}"#))
            .with_security(SecurityEntity::api_key_query("key", "<<apiKey>>"));

        let root = Section::new("Pet Store")
            .with_variable(Variable::new("base", "https://pets.example"))
            .with_variable(Variable::disabled("pet", "Rex"))
            .with_security(SecurityEntity::bearer("<<token>>"))
            .with_section(Section::new("Pets").with_request(list).with_request(create));

        Project::new("Pet Store").with_section(root)
    }

    #[test]
    fn test_tokens_are_rewritten() {
        assert_eq!(
            to_postman_tokens("<<a>>/<<b.c>>/<<not valid>>"),
            "{{a}}/{{b.c}}/<<not valid>>"
        );
    }

    #[test]
    fn test_single_root_section_is_the_collection() {
        let (collection, warnings) = PostmanExporter::to_collection(&sample());
        assert!(warnings.is_empty());
        assert_eq!(collection.info.name, "Pet Store");
        assert_eq!(collection.info.schema.as_deref(), Some(SCHEMA_V21));
        assert_eq!(collection.variable.len(), 2);
        assert!(collection.variable[1].disabled);
        assert_eq!(
            collection.auth.as_ref().unwrap().get_param("token").as_deref(),
            Some("{{token}}")
        );
        assert_eq!(collection.item.len(), 1);
        assert_eq!(collection.item[0].name, "Pets");
    }

    #[test]
    fn test_export_then_import_keeps_the_tree() {
        let original = sample();
        let report = PostmanExporter::export(&original, &ExportOptions::default()).unwrap();
        assert!(report.content.contains("{{base}}/pets"));

        let imported = PostmanImporter::new().import(&report.content).unwrap();
        assert_eq!(imported.stats.total(), 0, "{:?}", imported.warnings);

        let root = &imported.project.sections[0];
        let original_root = &original.sections[0];
        assert_eq!(root.variables, original_root.variables);
        assert_eq!(root.security, original_root.security);

        let pets = &root.sections[0];
        let original_pets = &original_root.sections[0];
        for (got, want) in pets.requests.iter().zip(&original_pets.requests) {
            assert_eq!(got.label, want.label);
            assert_eq!(got.method, want.method);
            assert_eq!(got.url, want.url);
            assert_eq!(got.query, want.query);
            assert_eq!(got.headers, want.headers);
            assert_eq!(got.security, want.security);
            assert_eq!(got.payload, want.payload);
        }
    }

    #[test]
    fn test_file_payloads_warn() {
        let upload = Request::new("Upload")
            .with_method(HttpMethod::Post)
            .with_url("https://x.test")
            .with_payload(Payload::multipart(vec![
                FormField::text("name", "a"),
                FormField::file("doc", "/tmp/doc.pdf"),
            ]));
        let raw = Request::new("Raw")
            .with_method(HttpMethod::Put)
            .with_url("https://x.test")
            .with_payload(Payload::file("/tmp/blob.bin"));
        let project = Project::new("Files")
            .with_section(Section::new("A").with_request(upload))
            .with_section(Section::new("B").with_request(raw));

        let report = PostmanExporter::export(&project, &ExportOptions::default()).unwrap();
        assert_eq!(report.stats.warning_count, 2);
        assert_eq!(report.warnings[0].path, "Files/A/Upload");

        let (collection, _) = PostmanExporter::to_collection(&project);
        assert_eq!(collection.info.name, "Files");
        assert_eq!(collection.item.len(), 2);
    }

    #[test]
    fn test_content_type_header_for_plain_text_types() {
        let request = Request::new("Csv")
            .with_method(HttpMethod::Post)
            .with_url("https://x.test")
            .with_payload(Payload::Text {
                content: "a,b".to_string(),
                content_type: "text/csv".to_string(),
            });
        let project = Project::new("P").with_section(Section::new("P").with_request(request));

        let (collection, _) = PostmanExporter::to_collection(&project);
        let Some(PostmanRequestDef::Full(full)) = &collection.item[0].request else {
            panic!("expected a full request");
        };
        let PostmanHeaders::List(headers) = &full.header else {
            panic!("expected a header list");
        };
        assert_eq!(headers[0].key, "Content-Type");
        assert_eq!(headers[0].value.as_deref(), Some("text/csv"));

        let report = PostmanExporter::export(&project, &ExportOptions::default()).unwrap();
        let imported = PostmanImporter::new().import(&report.content).unwrap();
        assert_eq!(
            imported.project.sections[0].requests[0].payload,
            Payload::Text {
                content: "a,b".to_string(),
                content_type: "text/csv".to_string(),
            }
        );
    }
}
