//! Request preparation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::{debug, warn};
use wirepad_domain::request::MultipartPart;
use wirepad_domain::{
    ApiKeyLocation, FormEncoding, Payload, PreparedBody, PreparedRequest, Replacement, Request,
    RequestLocation, SecurityEntity,
};

use crate::variables::{VariableSet, VariablesReplacer};

/// Why a request could not be prepared.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrepareError {
    /// URL is empty after substitution.
    #[error("URL is required")]
    EmptyUrl,

    /// URL does not parse or is not http(s).
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Output of [`prepare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preparation {
    /// The wire-ready request.
    pub request: PreparedRequest,
    /// Substitutions that were applied.
    pub replacements: Vec<Replacement>,
    /// Rows dropped because they were disabled or had a blank label.
    pub skipped: Vec<String>,
}

/// Prepares the request at `location` for sending.
///
/// Variables come from the enclosing sections, innermost first. Security is
/// resolved through inheritance before substitution so section credentials
/// can use variables too.
///
/// # Errors
///
/// Returns [`PrepareError`] when the URL is blank, does not parse, or uses a
/// scheme other than http or https.
pub fn prepare(location: RequestLocation<'_>) -> Result<Preparation, PrepareError> {
    let set = VariableSet::for_sections(location.sections);

    let mut source = location.request.clone();
    source.security = location.effective_security();

    let replaced = VariablesReplacer::apply(&source, &set);
    let request = replaced.request;

    let url = validate_url(&request)?;
    let mut skipped = Vec::new();

    let mut query = Vec::new();
    for (i, param) in request.query.iter().enumerate() {
        match keep_row(&format!("query[{i}]"), &param.label, param.disabled) {
            Ok(label) => query.push((label, param.value.clone())),
            Err(reason) => skipped.push(reason),
        }
    }

    let mut headers = Vec::new();
    for (i, header) in request.headers.iter().enumerate() {
        match keep_row(&format!("headers[{i}]"), &header.label, header.disabled) {
            Ok(label) => headers.push((label, header.value.clone())),
            Err(reason) => skipped.push(reason),
        }
    }

    apply_security(&request.security, &mut headers, &mut query);

    let body = prepare_body(&request.payload, &mut headers, &mut skipped);

    Ok(Preparation {
        request: PreparedRequest {
            request_id: request.id,
            method: request.method,
            url,
            query,
            headers,
            body,
        },
        replacements: replaced.replacements,
        skipped,
    })
}

fn validate_url(request: &Request) -> Result<String, PrepareError> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(PrepareError::EmptyUrl);
    }

    let parsed = request
        .parse_url()
        .map_err(|e| PrepareError::InvalidUrl(format!("{url}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PrepareError::InvalidUrl(
            "URL must start with http:// or https://".to_string(),
        ));
    }

    Ok(url.to_string())
}

/// Returns the trimmed label, or the skip reason.
fn keep_row(field: &str, label: &str, disabled: bool) -> Result<String, String> {
    if disabled {
        let reason = format!("{field}: '{label}' is disabled");
        debug!("{reason}");
        return Err(reason);
    }
    let trimmed = label.trim();
    if trimmed.is_empty() {
        let reason = format!("{field}: blank label");
        warn!("{reason}");
        return Err(reason);
    }
    Ok(trimmed.to_string())
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

/// Explicit header rows win over security-derived ones.
fn push_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    if has_header(headers, name) {
        debug!(header = name, "explicit header kept over security");
        return;
    }
    headers.push((name.to_string(), value));
}

fn apply_security(
    security: &SecurityEntity,
    headers: &mut Vec<(String, String)>,
    query: &mut Vec<(String, String)>,
) {
    match security {
        SecurityEntity::Inherit | SecurityEntity::None => {}
        SecurityEntity::Bearer { token } => {
            push_header(headers, "Authorization", format!("Bearer {token}"));
        }
        SecurityEntity::Basic { username, password } => {
            let encoded = STANDARD.encode(format!("{username}:{password}"));
            push_header(headers, "Authorization", format!("Basic {encoded}"));
        }
        SecurityEntity::ApiKey {
            key,
            value,
            location,
        } => {
            let key = key.trim();
            if key.is_empty() {
                warn!("API key security has a blank key name, ignored");
                return;
            }
            match location {
                ApiKeyLocation::Header => push_header(headers, key, value.clone()),
                ApiKeyLocation::Query => query.push((key.to_string(), value.clone())),
            }
        }
    }
}

fn prepare_body(
    payload: &Payload,
    headers: &mut Vec<(String, String)>,
    skipped: &mut Vec<String>,
) -> PreparedBody {
    match payload {
        Payload::None => PreparedBody::None,
        Payload::Text {
            content,
            content_type,
        } => {
            if !content_type.trim().is_empty() {
                push_header(headers, "Content-Type", content_type.trim().to_string());
            }
            PreparedBody::Text(content.clone())
        }
        Payload::File { path, content_type } => {
            if let Some(ct) = content_type.as_deref().filter(|ct| !ct.trim().is_empty()) {
                push_header(headers, "Content-Type", ct.trim().to_string());
            }
            PreparedBody::File(path.trim().to_string())
        }
        Payload::Form { encoding, fields } => {
            let mut kept = Vec::new();
            for (i, field) in fields.iter().enumerate() {
                match keep_row(&format!("payload.fields[{i}]"), &field.label, field.disabled) {
                    Ok(label) => kept.push((label, field)),
                    Err(reason) => skipped.push(reason),
                }
            }
            match encoding {
                FormEncoding::UrlEncoded => {
                    push_header(
                        headers,
                        "Content-Type",
                        "application/x-www-form-urlencoded".to_string(),
                    );
                    PreparedBody::UrlEncoded(
                        kept.into_iter()
                            .map(|(label, field)| (label, field.value.clone()))
                            .collect(),
                    )
                }
                // The adapter sets the multipart boundary header.
                FormEncoding::Multipart => PreparedBody::Multipart(
                    kept.into_iter()
                        .map(|(name, field)| {
                            if field.is_file {
                                MultipartPart::File {
                                    name,
                                    path: field.value.clone(),
                                }
                            } else {
                                MultipartPart::Text {
                                    name,
                                    value: field.value.clone(),
                                }
                            }
                        })
                        .collect(),
                ),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wirepad_domain::{FormField, Header, HttpMethod, QueryParam, Section, Variable};

    fn prepare_in(sections: &[&Section], request: &Request) -> Result<Preparation, PrepareError> {
        prepare(RequestLocation { sections, request })
    }

    #[test]
    fn test_skips_disabled_and_blank_rows() {
        let mut request = Request::get("r", "https://example.com/items")
            .with_query("page", "1")
            .with_header("Accept", "application/json");
        request.query.push(QueryParam::disabled("debug", "true"));
        request.query.push(QueryParam::new("   ", "x"));
        request.headers.push(Header::disabled("X-Off", "1"));
        request.headers.push(Header::new("", "orphan"));

        let prepared = prepare_in(&[], &request).unwrap();
        assert_eq!(prepared.request.query, vec![("page".into(), "1".into())]);
        assert_eq!(
            prepared.request.headers,
            vec![("Accept".into(), "application/json".into())]
        );
        assert_eq!(prepared.skipped.len(), 4);
    }

    #[test]
    fn test_labels_are_trimmed() {
        let request = Request::get("r", "https://example.com").with_header("  X-Trace ", "1");
        let prepared = prepare_in(&[], &request).unwrap();
        assert_eq!(prepared.request.headers, vec![("X-Trace".into(), "1".into())]);
    }

    #[test]
    fn test_rejects_blank_and_non_http_urls() {
        let blank = Request::get("r", "   ");
        assert_eq!(prepare_in(&[], &blank), Err(PrepareError::EmptyUrl));

        let ftp = Request::get("r", "ftp://example.com/file");
        assert!(matches!(
            prepare_in(&[], &ftp),
            Err(PrepareError::InvalidUrl(_))
        ));

        let unresolved = Request::get("r", "<<host>>/path");
        assert!(matches!(
            prepare_in(&[], &unresolved),
            Err(PrepareError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_variables_from_sections_are_applied() {
        let outer = Section::new("outer").with_variable(Variable::new("host", "outer.example"));
        let inner = Section::new("inner").with_variable(Variable::new("host", "inner.example"));
        let request = Request::get("r", "https://<<host>>/v1");

        let prepared = prepare_in(&[&outer, &inner], &request).unwrap();
        assert_eq!(prepared.request.url, "https://inner.example/v1");
        assert_eq!(prepared.replacements.len(), 1);
    }

    #[test]
    fn test_inherited_bearer_becomes_header() {
        let section = Section::new("api")
            .with_variable(Variable::new("token", "s3cret"))
            .with_security(SecurityEntity::bearer("<<token>>"));
        let request = Request::get("r", "https://example.com");

        let prepared = prepare_in(&[&section], &request).unwrap();
        assert_eq!(
            prepared.request.header("authorization"),
            Some("Bearer s3cret")
        );
    }

    #[test]
    fn test_basic_auth_is_base64() {
        let request = Request::get("r", "https://example.com")
            .with_security(SecurityEntity::basic("user", "pass"));
        let prepared = prepare_in(&[], &request).unwrap();
        assert_eq!(
            prepared.request.header("Authorization"),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[test]
    fn test_api_key_in_query() {
        let request = Request::get("r", "https://example.com")
            .with_security(SecurityEntity::api_key_query("api_key", "k"));
        let prepared = prepare_in(&[], &request).unwrap();
        assert_eq!(prepared.request.query, vec![("api_key".into(), "k".into())]);
        assert!(prepared.request.headers.is_empty());
    }

    #[test]
    fn test_explicit_none_blocks_inheritance() {
        let section = Section::new("api").with_security(SecurityEntity::bearer("t"));
        let request = Request::get("r", "https://example.com").with_security(SecurityEntity::None);
        let prepared = prepare_in(&[&section], &request).unwrap();
        assert_eq!(prepared.request.header("Authorization"), None);
    }

    #[test]
    fn test_text_payload_sets_content_type_once() {
        let request = Request::get("r", "https://example.com")
            .with_method(HttpMethod::Post)
            .with_payload(Payload::json("{}"));
        let prepared = prepare_in(&[], &request).unwrap();
        assert_eq!(
            prepared.request.header("content-type"),
            Some("application/json")
        );
        assert_eq!(prepared.request.body, PreparedBody::Text("{}".into()));

        let explicit = request.with_header("Content-Type", "application/vnd.api+json");
        let prepared = prepare_in(&[], &explicit).unwrap();
        let count = prepared
            .request
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .count();
        assert_eq!(count, 1);
        assert_eq!(
            prepared.request.header("Content-Type"),
            Some("application/vnd.api+json")
        );
    }

    #[test]
    fn test_multipart_parts() {
        let mut off = FormField::text("skip", "1");
        off.disabled = true;
        let request = Request::get("r", "https://example.com")
            .with_method(HttpMethod::Post)
            .with_payload(Payload::multipart(vec![
                FormField::text("name", "wirepad"),
                FormField::file("upload", "/tmp/a.bin"),
                off,
            ]));

        let prepared = prepare_in(&[], &request).unwrap();
        assert_eq!(
            prepared.request.body,
            PreparedBody::Multipart(vec![
                MultipartPart::Text {
                    name: "name".into(),
                    value: "wirepad".into()
                },
                MultipartPart::File {
                    name: "upload".into(),
                    path: "/tmp/a.bin".into()
                },
            ])
        );
        assert_eq!(prepared.skipped.len(), 1);
    }
}
