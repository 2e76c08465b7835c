//! Editing state of a single draft.
//!
//! The editor keeps the draft text in sync with the field values until manual
//! editing is enabled, after which the text is only changed by explicit edits
//! or an explicit [`DraftEditor::generate`].

use crate::render::Renderer;
use crate::store::Template;
use crate::Error;
use lexx_prelude::{Draft, FieldDescriptor, SavedDraft};
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct DraftEditor {
    slug: String,
    category: String,
    template: String,
    fields: Vec<FieldDescriptor>,
    renderer: Renderer,
    values: BTreeMap<String, String>,
    content: String,
    manual_edit: bool,
    timestamp: i64,
}

impl DraftEditor {
    /// Starts from the raw template text, placeholders included.
    pub fn new(template: &Template, renderer: Renderer, timestamp: i64) -> Self {
        Self {
            slug: template.slug().to_string(),
            category: template.metadata.category.clone(),
            template: template.content.clone(),
            fields: template.fields().to_vec(),
            renderer,
            values: BTreeMap::new(),
            content: template.content.clone(),
            manual_edit: false,
            timestamp,
        }
    }

    /// Restores a saved draft. Manual editing is enabled when the saved text
    /// no longer matches what the saved values produce.
    pub fn resume(template: &Template, renderer: Renderer, saved: SavedDraft) -> Self {
        let mut editor = Self::new(template, renderer, saved.draft.timestamp);
        editor.values = saved.values;
        editor.manual_edit = editor.render() != saved.draft.draft_content;
        editor.content = saved.draft.draft_content;
        editor
    }

    fn render(&self) -> String {
        self.renderer.render(&self.template, &self.values)
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_manual_edit(&self) -> bool {
        self.manual_edit
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
        if !self.manual_edit {
            self.generate();
        }
    }

    pub fn set_fields<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        if !self.manual_edit {
            self.generate();
        }
    }

    /// Fills the template again with the current values, dropping manual edits.
    pub fn generate(&mut self) -> &str {
        self.content = self.render();
        &self.content
    }

    pub fn toggle_manual_edit(&mut self) -> bool {
        self.manual_edit = !self.manual_edit;
        self.manual_edit
    }

    pub fn edit_content(&mut self, content: impl Into<String>) -> Result<(), Error> {
        if !self.manual_edit {
            return Err(Error::ManualEditDisabled);
        }
        self.content = content.into();
        Ok(())
    }

    /// Whether every placeholder of the template has a usable value. Signature
    /// lines or manual edits made of underscores do not count as unfilled.
    pub fn is_complete(&self) -> bool {
        self.renderer
            .unfilled(&self.template, &self.values)
            .is_empty()
    }

    /// Fields without a usable value, in schema order.
    pub fn missing_fields(&self) -> Vec<&FieldDescriptor> {
        self.fields
            .iter()
            .filter(|field| {
                !self
                    .renderer
                    .is_filled(self.values.get(&field.key).map(String::as_str))
            })
            .collect()
    }

    pub fn discard(&mut self) {
        self.values.clear();
        self.content.clear();
        self.manual_edit = false;
    }

    pub fn snapshot(&self) -> SavedDraft {
        SavedDraft {
            draft: Draft {
                slug: self.slug.clone(),
                draft_content: self.content.clone(),
                timestamp: self.timestamp,
            },
            category: Some(self.category.clone()),
            values: self.values.clone(),
        }
    }
}
