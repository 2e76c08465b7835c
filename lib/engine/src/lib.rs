pub mod draft;
pub mod loader;
pub mod render;
pub mod store;

use lexx_prelude::Metadata;
use std::sync::Arc;

pub use draft::DraftEditor;
pub use lexx_prelude::{Draft, FieldDescriptor, SavedDraft};
pub use render::{placeholders, replace_placeholders, EmptyValue, MARKER};
pub use store::{Inconsistency, Template, TemplateStore};

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub loader: loader::Config,
    #[serde(default)]
    pub render: render::Config,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to parse builtin metadata of {name}: {source}")]
    BuiltinMetadata {
        name: &'static str,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Loader(#[from] loader::Error),
    #[error("template {0} is defined more than once")]
    Duplicate(String),
    #[error("template {0} not found")]
    NotFound(String),
    #[error("templates and field schemas disagree: {}", store::join(.0))]
    Inconsistent(Vec<Inconsistency>),
    #[error("manual edit is disabled, enable it before changing the draft content")]
    ManualEditDisabled,
}

#[derive(Debug)]
struct InnerEngine {
    store: TemplateStore,
    renderer: render::Renderer,
}

/// Validated template store and renderer, cheap to clone.
#[derive(Clone, Debug)]
pub struct Engine(Arc<InnerEngine>);

impl TryFrom<Config> for Engine {
    type Error = Error;

    fn try_from(value: Config) -> Result<Self, Self::Error> {
        let store = TemplateStore::builtin()?;
        let store = match value.loader.build() {
            Some(loader) => store.with_templates(loader.load_all()?)?,
            None => store,
        };
        store.validate()?;
        tracing::debug!("template store ready with {} templates", store.len());
        Ok(Self(Arc::new(InnerEngine {
            store,
            renderer: value.render.into(),
        })))
    }
}

impl Engine {
    pub fn store(&self) -> &TemplateStore {
        &self.0.store
    }

    pub fn renderer(&self) -> render::Renderer {
        self.0.renderer
    }

    /// Fills the template identified by `slug` with the given values.
    pub fn fill<V>(&self, slug: &str, values: &V) -> Result<String, Error>
    where
        V: render::Lookup + ?Sized,
    {
        let content = self
            .store()
            .get_template(slug)
            .ok_or_else(|| Error::NotFound(slug.to_string()))?;
        Ok(self.0.renderer.render(content, values))
    }

    /// Starts editing a new draft of the template identified by `slug`.
    pub fn editor(&self, slug: &str, timestamp: i64) -> Result<DraftEditor, Error> {
        let template = self
            .store()
            .get(slug)
            .ok_or_else(|| Error::NotFound(slug.to_string()))?;
        Ok(DraftEditor::new(template, self.0.renderer, timestamp))
    }

    /// Starts a draft from a text written elsewhere for the template `slug`,
    /// like a rewrite adapted to a situation. Unknown slugs get a bare template
    /// titled `title`.
    pub fn adapted_editor(
        &self,
        slug: &str,
        title: &str,
        content: impl Into<String>,
        timestamp: i64,
    ) -> DraftEditor {
        let template = match self.store().get(slug) {
            Some(template) => template.with_content(content),
            None => Template::new(
                Metadata {
                    name: slug.to_string(),
                    title: title.to_string(),
                    description: None,
                    category: "general".into(),
                    fields: Vec::new(),
                },
                "",
            )
            .with_content(content),
        };
        DraftEditor::new(&template, self.0.renderer, timestamp)
    }

    /// Reopens a draft from the local history.
    pub fn resume(&self, draft: SavedDraft) -> Result<DraftEditor, Error> {
        let template = self
            .store()
            .get(&draft.draft.slug)
            .ok_or_else(|| Error::NotFound(draft.draft.slug.clone()))?;
        Ok(DraftEditor::resume(template, self.0.renderer, draft))
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Engine, Error};
    use std::collections::BTreeMap;
    use std::path::Path;

    fn write_template(root: &Path, name: &str, fields: &[&str], content: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let fields: Vec<_> = fields
            .iter()
            .map(|key| serde_json::json!({ "label": key, "key": key }))
            .collect();
        let metadata = serde_json::json!({
            "name": name,
            "title": "Custom",
            "category": "custom",
            "fields": fields,
            "template": { "content": content },
        });
        std::fs::write(dir.join("metadata.json"), metadata.to_string()).unwrap();
    }

    fn config_with(root: &Path) -> Config {
        let mut config = Config::default();
        config.loader.path = Some(root.to_path_buf());
        config
    }

    #[test]
    fn should_build_default_engine() {
        let engine = Engine::try_from(Config::default()).unwrap();
        assert!(engine.store().get_template("payment-reminder").is_some());
    }

    #[test]
    fn should_complete_every_builtin_template_once_filled() {
        let engine = Engine::try_from(Config::default()).unwrap();
        for template in engine.store().list() {
            let mut editor = engine.editor(template.slug(), 1).unwrap();
            assert!(!editor.is_complete(), "{} complete while empty", template.slug());
            let values: Vec<_> = template
                .fields()
                .iter()
                .map(|field| (field.key.clone(), "X".to_string()))
                .collect();
            editor.set_fields(values);
            assert!(editor.missing_fields().is_empty(), "{}", template.slug());
            assert!(editor.is_complete(), "{} incomplete once filled", template.slug());
            assert!(!editor.content().contains("{{"), "{}", template.slug());
        }
    }

    #[test]
    fn should_fill_builtin_template() {
        let engine = Engine::try_from(Config::default()).unwrap();
        let values = BTreeMap::from([
            ("toEmployee".to_string(), "Jane Doe".to_string()),
            ("fromCompany".to_string(), "Acme Ltd".to_string()),
        ]);
        let result = engine.fill("termination-notice", &values).unwrap();
        assert!(result.contains("Dear Jane Doe,"));
        assert!(result.contains("employment with Acme Ltd, effective from ________."));
    }

    #[test]
    fn should_edit_adapted_text() {
        let engine = Engine::try_from(Config::default()).unwrap();
        let mut editor = engine.adapted_editor(
            "termination-notice",
            "Termination Notice",
            "To {{toEmployee}}: your role ends on {{date}}.",
            7,
        );
        assert_eq!(editor.fields().len(), 2);
        assert_eq!(editor.fields()[0].label, "To Employee");
        editor.set_fields([("toEmployee", "Jane"), ("date", "1 May")]);
        assert!(editor.is_complete());
        assert_eq!(editor.content(), "To Jane: your role ends on 1 May.");
        assert_eq!(editor.snapshot().category.as_deref(), Some("notices"));

        let editor = engine.adapted_editor("gift-deed", "Gift Deed", "I, {{donor}}, give.", 7);
        assert_eq!(editor.slug(), "gift-deed");
        assert_eq!(editor.missing_fields()[0].key, "donor");
    }

    #[test]
    fn should_fail_filling_unknown_template() {
        let engine = Engine::try_from(Config::default()).unwrap();
        let err = engine
            .fill("identity-affidavit", &BTreeMap::<String, String>::new())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(name) if name == "identity-affidavit"));
    }

    #[test]
    fn should_merge_local_templates() {
        let root = tempfile::tempdir().unwrap();
        write_template(root.path(), "affidavit", &["name"], "I, {{name}}, declare.");
        let engine = Engine::try_from(config_with(root.path())).unwrap();
        assert!(engine.store().get("payment-reminder").is_some());
        let values = BTreeMap::from([("name".to_string(), "Jane".to_string())]);
        assert_eq!(engine.fill("affidavit", &values).unwrap(), "I, Jane, declare.");
    }

    #[test]
    fn should_reject_inconsistent_local_template() {
        let root = tempfile::tempdir().unwrap();
        write_template(root.path(), "affidavit", &["name", "place"], "I, {{fullName}}.");
        let err = Engine::try_from(config_with(root.path())).unwrap_err();
        let Error::Inconsistent(items) = err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn should_reject_local_template_shadowing_builtin() {
        let root = tempfile::tempdir().unwrap();
        write_template(root.path(), "payment-reminder", &[], "Pay.");
        let err = Engine::try_from(config_with(root.path())).unwrap_err();
        assert!(matches!(err, Error::Duplicate(name) if name == "payment-reminder"));
    }
}
