use std::collections::BTreeMap;
use std::path::PathBuf;

/// Pairs a human readable label with the placeholder identifier it fills.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct FieldDescriptor {
    pub label: String,
    pub key: String,
}

impl FieldDescriptor {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct Metadata {
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "Metadata::default_category")]
    pub category: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl Metadata {
    fn default_category() -> String {
        "general".into()
    }
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct MetadataWithTemplate<T = TemplateDefinition> {
    #[serde(flatten)]
    pub inner: Metadata,
    #[serde(default)]
    pub template: T,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct LocalTemplateDefinition {
    pub path: PathBuf,
}

impl Default for LocalTemplateDefinition {
    fn default() -> Self {
        Self {
            path: PathBuf::from("template.txt"),
        }
    }
}

#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct EmbeddedTemplateDefinition {
    pub content: String,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum TemplateDefinition {
    Local(LocalTemplateDefinition),
    Embedded(EmbeddedTemplateDefinition),
}

impl Default for TemplateDefinition {
    fn default() -> Self {
        Self::Local(LocalTemplateDefinition::default())
    }
}

/// A filled-in template as exchanged with the drafts API.
///
/// The timestamp is the creation time in milliseconds since the Unix epoch and
/// doubles as the identifier of the draft for a given user.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Draft {
    pub slug: String,
    pub draft_content: String,
    pub timestamp: i64,
}

/// A draft as kept in the local history, with the values used to fill it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct SavedDraft {
    #[serde(flatten)]
    pub draft: Draft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, String>,
}
