//! Plain-text rendering of projects, results and import reports.

use std::fmt::Write as _;

use wirepad_domain::{ExecutionOutcome, ExecutionResult, Project, Request, Section};
use wirepad_infrastructure::ImportWarning;

/// Renders the project as an indented tree.
#[must_use]
pub fn tree(project: &Project, show_ids: bool) -> String {
    let mut out = project.label.clone();
    if show_ids {
        let _ = write!(out, "  #{}", project.id);
    }
    out.push('\n');

    let count = project.sections.len();
    for (i, section) in project.sections.iter().enumerate() {
        section_lines(&mut out, section, "", i + 1 == count, show_ids);
    }
    out
}

fn section_lines(out: &mut String, section: &Section, prefix: &str, last: bool, show_ids: bool) {
    let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
    let _ = write!(out, "{prefix}{branch}{}", section.label);
    if !section.variables.is_empty() {
        let _ = write!(out, " ({} vars)", section.variables.len());
    }
    if !section.security.is_inherit() {
        let _ = write!(out, " [auth: {}]", section.security.kind_name());
    }
    if show_ids {
        let _ = write!(out, "  #{}", section.id);
    }
    out.push('\n');

    let child_prefix = format!("{prefix}{indent}");
    let total = section.sections.len() + section.requests.len();
    let mut index = 0;
    for child in &section.sections {
        index += 1;
        section_lines(out, child, &child_prefix, index == total, show_ids);
    }
    for request in &section.requests {
        index += 1;
        request_line(out, request, &child_prefix, index == total, show_ids);
    }
}

fn request_line(out: &mut String, request: &Request, prefix: &str, last: bool, show_ids: bool) {
    let branch = if last { "└── " } else { "├── " };
    let _ = write!(out, "{prefix}{branch}{:<7} {}", request.method.as_str(), request.label);
    if show_ids {
        let _ = write!(out, "  #{}", request.id);
    }
    out.push('\n');
}

/// Renders an execution result the way `send` prints it.
#[must_use]
pub fn execution(result: &ExecutionResult, show_headers: bool) -> String {
    let mut out = String::new();
    for r in &result.replacements {
        let _ = writeln!(out, "  {} x{} in {}", r.key, r.count, r.field);
    }

    match &result.outcome {
        ExecutionOutcome::Completed(response) => {
            let _ = writeln!(
                out,
                "HTTP {} {} ({} ms, {} bytes)",
                response.status,
                response.status_text,
                response.duration.as_millis(),
                response.size
            );
            if show_headers {
                for (name, value) in &response.headers {
                    let _ = writeln!(out, "{name}: {value}");
                }
            }
            out.push('\n');
            out.push_str(&body_text(&response.body_text(), response.is_json()));
            if !out.ends_with('\n') {
                out.push('\n');
            }
        }
        ExecutionOutcome::Failed {
            kind,
            message,
            details,
        } => {
            let _ = writeln!(out, "{}: {message}", kind.title());
            if let Some(details) = details {
                let _ = writeln!(out, "  {details}");
            }
            let suggestions = kind.suggestions();
            if !suggestions.is_empty() {
                out.push_str("Suggestions:\n");
                for suggestion in suggestions {
                    let _ = writeln!(out, "  - {suggestion}");
                }
            }
        }
        ExecutionOutcome::Canceled => out.push_str("Request canceled\n"),
    }
    out
}

fn body_text(body: &str, is_json: bool) -> String {
    if is_json {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                return pretty;
            }
        }
    }
    body.to_string()
}

/// One line per warning, followed by nothing when there are none.
#[must_use]
pub fn warnings(warnings: &[ImportWarning]) -> String {
    warnings.iter().fold(String::new(), |mut out, w| {
        let _ = writeln!(out, "{w}");
        out
    })
}
