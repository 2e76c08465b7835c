use super::{ApiClient, Error};
use reqwest::Method;

/// A builtin template the backend finds close to a free text query.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct TemplateSuggestion {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub score: f64,
}

/// A template rewritten by the backend to match a described situation. The
/// placeholders of the rewrite are the ones of the template it comes from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct GeneratedDraft {
    pub slug: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub placeholders: Vec<String>,
}

impl ApiClient {
    pub async fn suggest_templates(&self, query: &str) -> Result<Vec<TemplateSuggestion>, Error> {
        tracing::debug!("looking for templates matching {query:?}");
        let req = self
            .request(Method::POST, "/docs/search")?
            .json(&serde_json::json!({ "query": query }));
        self.send(req).await
    }

    pub async fn generate_draft(&self, situation: &str) -> Result<GeneratedDraft, Error> {
        tracing::debug!("generating a draft for a {} bytes situation", situation.len());
        let req = self
            .request(Method::POST, "/docs/generate-draft")?
            .json(&serde_json::json!({ "situation": situation }));
        self.send(req).await
    }
}
