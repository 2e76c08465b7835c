use crate::render::placeholders;
use crate::Error;
use lexx_prelude::{FieldDescriptor, Metadata};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

macro_rules! builtin {
    ($($slug:literal),* $(,)?) => {
        &[$((
            $slug,
            include_str!(concat!("../template/", $slug, "/metadata.json")),
            include_str!(concat!("../template/", $slug, "/template.txt")),
        )),*]
    };
}

const BUILTIN: &[(&str, &str, &str)] = builtin!(
    "consulting-agreement",
    "employment-contract",
    "employment-offer-letter",
    "invoice-for-services",
    "joint-venture-agreement",
    "lease-agreement",
    "legal-demand-notice",
    "loan-agreement",
    "memorandum-of-understanding",
    "non-disclosure-agreement",
    "notice-for-breach-of-contract",
    "notice-for-recovery-of-dues",
    "notice-to-vacate",
    "partnership-agreement",
    "payment-reminder",
    "promissory-note",
    "service-agreement",
    "shareholders-agreement",
    "termination-notice",
);

#[derive(Clone, Debug)]
pub struct Template {
    pub metadata: Metadata,
    pub content: String,
}

impl Template {
    pub fn new(metadata: Metadata, content: impl Into<String>) -> Self {
        Self {
            metadata,
            content: content.into(),
        }
    }

    pub fn slug(&self) -> &str {
        &self.metadata.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.metadata.fields
    }

    /// The same template with another text, such as a rewrite of this one.
    /// Fields follow the placeholders of the new text, keeping known labels.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        let content = content.into();
        let fields = placeholders(&content)
            .into_iter()
            .map(|key| {
                self.fields()
                    .iter()
                    .find(|field| field.key == key)
                    .cloned()
                    .unwrap_or_else(|| FieldDescriptor::new(key, key))
            })
            .collect();
        let metadata = Metadata {
            fields,
            ..self.metadata.clone()
        };
        Self::new(metadata, content)
    }

    fn inconsistencies(&self, found: &mut Vec<Inconsistency>) {
        let used = placeholders(&self.content);
        let mut declared = BTreeSet::new();
        for field in self.fields() {
            if !declared.insert(field.key.as_str()) {
                found.push(Inconsistency::DuplicateField {
                    slug: self.slug().to_string(),
                    key: field.key.clone(),
                });
            }
        }
        for key in used.iter() {
            if !declared.contains(key) {
                found.push(Inconsistency::MissingField {
                    slug: self.slug().to_string(),
                    key: key.to_string(),
                });
            }
        }
        for key in declared {
            if !used.contains(&key) {
                found.push(Inconsistency::UnusedField {
                    slug: self.slug().to_string(),
                    key: key.to_string(),
                });
            }
        }
    }
}

/// A mismatch between a template text and its field schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    /// The text uses a placeholder no field fills.
    MissingField { slug: String, key: String },
    /// A field fills a placeholder the text never uses.
    UnusedField { slug: String, key: String },
    DuplicateField { slug: String, key: String },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { slug, key } => {
                write!(f, "{slug}: placeholder {{{{{key}}}}} has no field")
            }
            Self::UnusedField { slug, key } => {
                write!(f, "{slug}: field {key} is not used by the template")
            }
            Self::DuplicateField { slug, key } => {
                write!(f, "{slug}: field {key} is declared more than once")
            }
        }
    }
}

pub(crate) fn join(items: &[Inconsistency]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read-only lookup of templates and field schemas by slug.
#[derive(Clone, Debug, Default)]
pub struct TemplateStore {
    templates: BTreeMap<String, Template>,
}

impl TemplateStore {
    /// The templates compiled into the engine.
    pub fn builtin() -> Result<Self, Error> {
        BUILTIN
            .iter()
            .map(|&(name, metadata, content)| {
                let metadata: Metadata = serde_json::from_str(metadata).map_err(|source| {
                    tracing::error!("unable to parse builtin metadata of {name}: {source:?}");
                    Error::BuiltinMetadata { name, source }
                })?;
                Ok(Template::new(metadata, content))
            })
            .collect::<Result<Vec<_>, Error>>()
            .and_then(|templates| Self::default().with_templates(templates))
    }

    /// Adds templates to the store, refusing a slug that is already taken.
    pub fn with_templates<I>(mut self, templates: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Template>,
    {
        for template in templates {
            let slug = template.slug().to_string();
            if self.templates.contains_key(&slug) {
                metrics::counter!("template_error", "reason" => "duplicate").increment(1);
                return Err(Error::Duplicate(slug));
            }
            self.templates.insert(slug, template);
        }
        Ok(self)
    }

    pub fn get(&self, slug: &str) -> Option<&Template> {
        self.templates.get(slug)
    }

    pub fn get_template(&self, slug: &str) -> Option<&str> {
        self.get(slug).map(|item| item.content.as_str())
    }

    /// The ordered field schema of a template, empty when the slug is unknown.
    pub fn get_fields(&self, slug: &str) -> &[FieldDescriptor] {
        self.get(slug).map(Template::fields).unwrap_or_default()
    }

    pub fn list(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Template> {
        self.list()
            .filter(move |item| item.metadata.category == category)
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.list()
            .map(|item| item.metadata.category.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Every placeholder must have a field and every field a placeholder.
    pub fn validate(&self) -> Result<(), Error> {
        let mut found = Vec::new();
        for template in self.list() {
            template.inconsistencies(&mut found);
        }
        if found.is_empty() {
            Ok(())
        } else {
            for item in found.iter() {
                tracing::error!("template inconsistency: {item}");
            }
            metrics::counter!("template_error", "reason" => "inconsistent").increment(1);
            Err(Error::Inconsistent(found))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Inconsistency, Template, TemplateStore};
    use crate::Error;
    use lexx_prelude::{FieldDescriptor, Metadata};

    fn template(slug: &str, content: &str, keys: &[&str]) -> Template {
        Template::new(
            Metadata {
                name: slug.into(),
                title: slug.into(),
                description: None,
                category: "notices".into(),
                fields: keys
                    .iter()
                    .map(|key| FieldDescriptor::new(key.to_uppercase(), *key))
                    .collect(),
            },
            content,
        )
    }

    #[test]
    fn builtin_store_should_be_consistent() {
        let store = TemplateStore::builtin().unwrap();
        assert_eq!(store.len(), 19);
        store.validate().unwrap();
    }

    #[test]
    fn builtin_store_should_expose_fields_in_order() {
        let store = TemplateStore::builtin().unwrap();
        let keys: Vec<_> = store
            .get_fields("termination-notice")
            .iter()
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(keys, vec!["date", "toEmployee", "fromCompany", "reason"]);
        assert_eq!(store.get_fields("payment-reminder")[1].label, "Reference Number");
    }

    #[test]
    fn should_rebuild_fields_for_new_content() {
        let original = template("notice", "Dear {{name}}, pay {{amount}}.", &["name", "amount"]);
        let rewritten = original.with_content("{{amount}} is due, {{name}}, by {{date}}.");
        let keys: Vec<_> = rewritten.fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["amount", "name", "date"]);
        assert_eq!(rewritten.fields()[0].label, "AMOUNT");
        assert_eq!(rewritten.fields()[2].label, "date");
        assert_eq!(rewritten.slug(), "notice");
        assert!(original.with_content("No placeholder.").fields().is_empty());
    }

    #[test]
    fn should_return_nothing_for_unknown_slug() {
        let store = TemplateStore::builtin().unwrap();
        assert!(store.get_template("writ-petition").is_none());
        assert!(store.get_fields("writ-petition").is_empty());
    }

    #[test]
    fn should_group_by_category() {
        let store = TemplateStore::builtin().unwrap();
        let notices: Vec<_> = store.by_category("notices").map(Template::slug).collect();
        assert!(notices.contains(&"payment-reminder"));
        assert!(notices.contains(&"legal-demand-notice"));
        assert!(!notices.contains(&"lease-agreement"));
        assert!(store.categories().contains("agreements"));
    }

    #[test]
    fn should_refuse_duplicate_slug() {
        let err = TemplateStore::builtin()
            .unwrap()
            .with_templates(vec![template("payment-reminder", "", &[])])
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate(slug) if slug == "payment-reminder"));
    }

    #[test]
    fn should_report_every_inconsistency() {
        let store = TemplateStore::default()
            .with_templates(vec![
                template("a", "{{name}} {{amount}}", &["name", "days"]),
                template("b", "{{x}}", &["x", "x"]),
                template("c", "Dear {{who}}", &["who"]),
            ])
            .unwrap();
        let Err(Error::Inconsistent(found)) = store.validate() else {
            panic!("store should be inconsistent");
        };
        assert_eq!(
            found,
            vec![
                Inconsistency::MissingField {
                    slug: "a".into(),
                    key: "amount".into()
                },
                Inconsistency::UnusedField {
                    slug: "a".into(),
                    key: "days".into()
                },
                Inconsistency::DuplicateField {
                    slug: "b".into(),
                    key: "x".into()
                },
            ]
        );
        assert_eq!(
            found[0].to_string(),
            "a: placeholder {{amount}} has no field"
        );
    }
}
