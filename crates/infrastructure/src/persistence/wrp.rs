//! On-disk shape of a `.wrp` project file.
//!
//! Mirrors the domain tree with secret fields encrypted and long text
//! compressed. Rows with no sensitive content (query, headers, form fields)
//! reuse the domain types directly.

use serde::{Deserialize, Serialize};
use wirepad_domain::{
    ApiKeyLocation, FormEncoding, FormField, Header, HttpMethod, Payload, Project, QueryParam,
    Request, Section, SecurityEntity, Variable,
};

use crate::codec::{compressed, encrypted};

/// Value of the `format` field.
pub const FORMAT_TAG: &str = "wirepad-project";

/// Current `schema_version`.
pub const SCHEMA_VERSION: u32 = 1;

/// Just the envelope, read before the body so a foreign file gets a clear error.
#[derive(Debug, Deserialize)]
pub(super) struct WrpHeader {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub schema_version: u32,
}

/// Whole file.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct WrpFile {
    pub format: String,
    pub schema_version: u32,
    pub project: ProjectRecord,
}

impl WrpFile {
    pub(super) fn new(project: &Project) -> Self {
        Self {
            format: FORMAT_TAG.to_string(),
            schema_version: SCHEMA_VERSION,
            project: project.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct ProjectRecord {
    id: String,
    label: String,
    #[serde(with = "compressed", default)]
    notes: String,
    #[serde(default)]
    sections: Vec<SectionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SectionRecord {
    id: String,
    label: String,
    #[serde(with = "compressed", default)]
    notes: String,
    #[serde(default)]
    variables: Vec<VariableRecord>,
    #[serde(default)]
    security: SecurityRecord,
    #[serde(default)]
    sections: Vec<Self>,
    #[serde(default)]
    requests: Vec<RequestRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VariableRecord {
    key: String,
    #[serde(default)]
    disabled: bool,
    #[serde(with = "encrypted", default)]
    value: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct RequestRecord {
    id: String,
    label: String,
    #[serde(with = "compressed", default)]
    notes: String,
    method: HttpMethod,
    url: String,
    #[serde(default)]
    query: Vec<QueryParam>,
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default)]
    security: SecurityRecord,
    #[serde(default)]
    payload: PayloadRecord,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SecurityRecord {
    #[default]
    Inherit,
    None,
    ApiKey {
        key: String,
        #[serde(with = "encrypted")]
        value: String,
        #[serde(default)]
        location: ApiKeyLocation,
    },
    Bearer {
        #[serde(with = "encrypted")]
        token: String,
    },
    Basic {
        username: String,
        #[serde(with = "encrypted")]
        password: String,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PayloadRecord {
    #[default]
    None,
    Text {
        #[serde(with = "compressed")]
        content: String,
        content_type: String,
    },
    File {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
    Form {
        encoding: FormEncoding,
        fields: Vec<FormField>,
    },
}

impl From<&Project> for ProjectRecord {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            label: project.label.clone(),
            notes: project.notes.clone(),
            sections: project.sections.iter().map(Into::into).collect(),
        }
    }
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Self {
            id: record.id,
            label: record.label,
            notes: record.notes,
            sections: record.sections.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&Section> for SectionRecord {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id.clone(),
            label: section.label.clone(),
            notes: section.notes.clone(),
            variables: section
                .variables
                .iter()
                .map(|v| VariableRecord {
                    key: v.key.clone(),
                    disabled: v.disabled,
                    value: v.value.clone(),
                })
                .collect(),
            security: (&section.security).into(),
            sections: section.sections.iter().map(Into::into).collect(),
            requests: section.requests.iter().map(Into::into).collect(),
        }
    }
}

impl From<SectionRecord> for Section {
    fn from(record: SectionRecord) -> Self {
        Self {
            id: record.id,
            label: record.label,
            notes: record.notes,
            variables: record
                .variables
                .into_iter()
                .map(|v| Variable {
                    key: v.key,
                    disabled: v.disabled,
                    value: v.value,
                })
                .collect(),
            security: record.security.into(),
            sections: record.sections.into_iter().map(Into::into).collect(),
            requests: record.requests.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&Request> for RequestRecord {
    fn from(request: &Request) -> Self {
        Self {
            id: request.id.clone(),
            label: request.label.clone(),
            notes: request.notes.clone(),
            method: request.method,
            url: request.url.clone(),
            query: request.query.clone(),
            headers: request.headers.clone(),
            security: (&request.security).into(),
            payload: (&request.payload).into(),
        }
    }
}

impl From<RequestRecord> for Request {
    fn from(record: RequestRecord) -> Self {
        Self {
            id: record.id,
            label: record.label,
            notes: record.notes,
            method: record.method,
            url: record.url,
            query: record.query,
            headers: record.headers,
            security: record.security.into(),
            payload: record.payload.into(),
        }
    }
}

impl From<&SecurityEntity> for SecurityRecord {
    fn from(security: &SecurityEntity) -> Self {
        match security.clone() {
            SecurityEntity::Inherit => Self::Inherit,
            SecurityEntity::None => Self::None,
            SecurityEntity::ApiKey {
                key,
                value,
                location,
            } => Self::ApiKey {
                key,
                value,
                location,
            },
            SecurityEntity::Bearer { token } => Self::Bearer { token },
            SecurityEntity::Basic { username, password } => Self::Basic { username, password },
        }
    }
}

impl From<SecurityRecord> for SecurityEntity {
    fn from(record: SecurityRecord) -> Self {
        match record {
            SecurityRecord::Inherit => Self::Inherit,
            SecurityRecord::None => Self::None,
            SecurityRecord::ApiKey {
                key,
                value,
                location,
            } => Self::ApiKey {
                key,
                value,
                location,
            },
            SecurityRecord::Bearer { token } => Self::Bearer { token },
            SecurityRecord::Basic { username, password } => Self::Basic { username, password },
        }
    }
}

impl From<&Payload> for PayloadRecord {
    fn from(payload: &Payload) -> Self {
        match payload.clone() {
            Payload::None => Self::None,
            Payload::Text {
                content,
                content_type,
            } => Self::Text {
                content,
                content_type,
            },
            Payload::File { path, content_type } => Self::File { path, content_type },
            Payload::Form { encoding, fields } => Self::Form { encoding, fields },
        }
    }
}

impl From<PayloadRecord> for Payload {
    fn from(record: PayloadRecord) -> Self {
        match record {
            PayloadRecord::None => Self::None,
            PayloadRecord::Text {
                content,
                content_type,
            } => Self::Text {
                content,
                content_type,
            },
            PayloadRecord::File { path, content_type } => Self::File { path, content_type },
            PayloadRecord::Form { encoding, fields } => Self::Form { encoding, fields },
        }
    }
}
