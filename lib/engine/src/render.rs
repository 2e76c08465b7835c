use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// Written in place of every placeholder that has no value.
pub const MARKER: &str = "________";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(.*?)\}\}").expect("placeholder pattern is hardcoded and must be valid")
});

/// How an explicitly empty value is written in the draft.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyValue {
    /// An empty value is treated like a missing one and replaced with [`MARKER`].
    #[default]
    Marker,
    /// An empty value is written as an empty string.
    Keep,
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub empty_value: EmptyValue,
}

/// Anything a placeholder value can be looked up from.
pub trait Lookup {
    fn lookup(&self, key: &str) -> Option<&str>;
}

impl Lookup for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl Lookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl Lookup for [(&str, &str)] {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
    }
}

impl<T: Lookup + ?Sized> Lookup for &T {
    fn lookup(&self, key: &str) -> Option<&str> {
        (**self).lookup(key)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Renderer {
    empty_value: EmptyValue,
}

impl From<Config> for Renderer {
    fn from(value: Config) -> Self {
        Self {
            empty_value: value.empty_value,
        }
    }
}

impl Renderer {
    pub fn new(empty_value: EmptyValue) -> Self {
        Self { empty_value }
    }

    /// Whether a value would be written as is rather than replaced by the marker.
    pub fn is_filled(&self, value: Option<&str>) -> bool {
        match (value, self.empty_value) {
            (Some(""), EmptyValue::Marker) | (None, _) => false,
            (Some(_), _) => true,
        }
    }

    fn resolve<'a, V: Lookup + ?Sized>(&self, values: &'a V, key: &str) -> &'a str {
        match values.lookup(key) {
            Some(value) if self.is_filled(Some(value)) => value,
            _ => MARKER,
        }
    }

    /// Replaces every `{{key}}` token of the template in a single pass.
    ///
    /// Substituted values are never scanned again, so a value containing
    /// `{{...}}` ends up verbatim in the output.
    pub fn render<V: Lookup + ?Sized>(&self, template: &str, values: &V) -> String {
        PLACEHOLDER_RE
            .replace_all(template, |caps: &Captures| {
                let key = caps.get(1).map_or("", |m| m.as_str());
                self.resolve(values, key).to_string()
            })
            .into_owned()
    }

    /// Placeholders of the template that would be rendered as [`MARKER`].
    pub fn unfilled<'a, V>(&self, template: &'a str, values: &V) -> Vec<&'a str>
    where
        V: Lookup + ?Sized,
    {
        placeholders(template)
            .into_iter()
            .filter(|key| !self.is_filled(values.lookup(key)))
            .collect()
    }
}

/// Fills the template with the default policy, empty values becoming [`MARKER`].
pub fn replace_placeholders<V: Lookup + ?Sized>(template: &str, values: &V) -> String {
    Renderer::default().render(template, values)
}

/// Placeholder identifiers in order of first appearance, without duplicates.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut found: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        if let Some(key) = caps.get(1).map(|m| m.as_str()) {
            if !found.contains(&key) {
                found.push(key);
            }
        }
    }
    found
}
