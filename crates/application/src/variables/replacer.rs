//! Token substitution over request fields.

use tracing::debug;
use wirepad_domain::{Payload, Replacement, Request, SecurityEntity};

use super::VariableSet;

/// Replaces every token of `set` in `text`.
///
/// Keys are applied in set order. For each key the text is scanned left to
/// right and each occurrence is replaced once; scanning resumes after the
/// inserted value, so a value never re-expands its own key.
///
/// Returns the new text and `(token, count)` for every key that matched.
#[must_use]
pub fn replace_in(text: &str, set: &VariableSet) -> (String, Vec<(String, usize)>) {
    let mut current = text.to_string();
    let mut hits = Vec::new();

    for (token, value) in set.iter() {
        let (next, count) = replace_token(&current, token, value);
        if count > 0 {
            current = next;
            hits.push((token.to_string(), count));
        }
    }

    (current, hits)
}

fn replace_token(text: &str, token: &str, value: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut count = 0;

    while let Some(pos) = rest.find(token) {
        out.push_str(&rest[..pos]);
        out.push_str(value);
        rest = &rest[pos + token.len()..];
        count += 1;
    }
    out.push_str(rest);

    (out, count)
}

/// A request after substitution, with the log of what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    /// The substituted copy.
    pub request: Request,
    /// Every field/key pair that matched.
    pub replacements: Vec<Replacement>,
}

/// Applies a [`VariableSet`] to every text field of a request.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariablesReplacer;

impl VariablesReplacer {
    /// Substitutes across URL, query, headers, security and payload.
    #[must_use]
    pub fn apply(request: &Request, set: &VariableSet) -> Replaced {
        let mut out = request.clone();
        let mut log = Log {
            set,
            replacements: Vec::new(),
        };

        if set.is_empty() {
            return Replaced {
                request: out,
                replacements: Vec::new(),
            };
        }

        log.sub("url", &mut out.url);

        for (i, param) in out.query.iter_mut().enumerate() {
            log.sub(&format!("query[{i}].label"), &mut param.label);
            log.sub(&format!("query[{i}].value"), &mut param.value);
        }

        for (i, header) in out.headers.iter_mut().enumerate() {
            log.sub(&format!("headers[{i}].label"), &mut header.label);
            log.sub(&format!("headers[{i}].value"), &mut header.value);
        }

        match &mut out.security {
            SecurityEntity::Inherit | SecurityEntity::None => {}
            SecurityEntity::ApiKey { key, value, .. } => {
                log.sub("security.key", key);
                log.sub("security.value", value);
            }
            SecurityEntity::Bearer { token } => log.sub("security.token", token),
            SecurityEntity::Basic { username, password } => {
                log.sub("security.username", username);
                log.sub("security.password", password);
            }
        }

        match &mut out.payload {
            Payload::None => {}
            Payload::Text { content, .. } => log.sub("payload.content", content),
            Payload::File { path, .. } => log.sub("payload.path", path),
            Payload::Form { fields, .. } => {
                for (i, field) in fields.iter_mut().enumerate() {
                    log.sub(&format!("payload.fields[{i}].label"), &mut field.label);
                    log.sub(&format!("payload.fields[{i}].value"), &mut field.value);
                }
            }
        }

        Replaced {
            request: out,
            replacements: log.replacements,
        }
    }
}

struct Log<'a> {
    set: &'a VariableSet,
    replacements: Vec<Replacement>,
}

impl Log<'_> {
    fn sub(&mut self, field: &str, text: &mut String) {
        let (replaced, hits) = replace_in(text, self.set);
        if hits.is_empty() {
            return;
        }
        *text = replaced;
        for (key, count) in hits {
            debug!(field, %key, count, "variable replaced");
            self.replacements.push(Replacement {
                field: field.to_string(),
                key,
                count,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wirepad_domain::{FormField, Section, Variable};

    fn set_of(pairs: &[(&str, &str)]) -> VariableSet {
        let section = pairs.iter().fold(Section::new("vars"), |s, (k, v)| {
            s.with_variable(Variable::new(*k, *v))
        });
        VariableSet::for_sections(&[&section])
    }

    #[test]
    fn test_replaces_every_occurrence_left_to_right() {
        let set = set_of(&[("id", "42")]);
        let (text, hits) = replace_in("/<<id>>/items/<<id>>", &set);
        assert_eq!(text, "/42/items/42");
        assert_eq!(hits, vec![("<<id>>".to_string(), 2)]);
    }

    #[test]
    fn test_value_containing_own_key_is_not_reexpanded() {
        let set = set_of(&[("a", "<<a>>!")]);
        let (text, hits) = replace_in("<<a>>", &set);
        assert_eq!(text, "<<a>>!");
        assert_eq!(hits, vec![("<<a>>".to_string(), 1)]);
    }

    #[test]
    fn test_keys_apply_in_order() {
        // The first value introduces a token the second key then replaces.
        let set = set_of(&[("base", "<<host>>/v1"), ("host", "example.com")]);
        let (text, _) = replace_in("https://<<base>>", &set);
        assert_eq!(text, "https://example.com/v1");
    }

    #[test]
    fn test_unknown_tokens_are_left_alone() {
        let set = set_of(&[("known", "x")]);
        let (text, hits) = replace_in("<<unknown>> <<known>>", &set);
        assert_eq!(text, "<<unknown>> x");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_idempotent_when_no_keys_remain() {
        let set = set_of(&[("host", "example.com"), ("token", "abc")]);
        let (once, _) = replace_in("https://<<host>>/?t=<<token>>", &set);
        let (twice, hits) = replace_in(&once, &set);
        assert_eq!(once, twice);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_apply_covers_all_fields() {
        let set = set_of(&[("host", "example.com"), ("tok", "secret"), ("v", "1")]);
        let request = Request::get("r", "https://<<host>>/items")
            .with_query("<<v>>", "<<v>>")
            .with_header("Authorization-Hint", "<<tok>>")
            .with_security(SecurityEntity::bearer("<<tok>>"))
            .with_payload(Payload::url_encoded(vec![FormField::text("n", "<<v>>")]));

        let replaced = VariablesReplacer::apply(&request, &set);
        let out = &replaced.request;
        assert_eq!(out.url, "https://example.com/items");
        assert_eq!(out.query[0].label, "1");
        assert_eq!(out.query[0].value, "1");
        assert_eq!(out.headers[0].value, "secret");
        assert_eq!(out.security, SecurityEntity::bearer("secret"));
        match &out.payload {
            Payload::Form { fields, .. } => assert_eq!(fields[0].value, "1"),
            other => unreachable!("unexpected payload {other:?}"),
        }

        let fields: Vec<_> = replaced
            .replacements
            .iter()
            .map(|r| r.field.as_str())
            .collect();
        assert_eq!(
            fields,
            vec![
                "url",
                "query[0].label",
                "query[0].value",
                "headers[0].value",
                "security.token",
                "payload.fields[0].value",
            ]
        );
    }

    #[test]
    fn test_apply_with_empty_set_is_identity() {
        let request = Request::get("r", "https://<<host>>/");
        let replaced = VariablesReplacer::apply(&request, &VariableSet::new());
        assert_eq!(replaced.request, request);
        assert!(replaced.replacements.is_empty());
    }
}
