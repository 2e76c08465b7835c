use super::{ApiClient, Error};
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    All,
    Citation,
    Parties,
    Facts,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Allowed,
    Dismissed,
    Partly,
    #[default]
    Na,
}

#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    mode: SearchMode,
    filters: &'a SearchFilters,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct CaseStub {
    pub id: String,
    pub title: String,
    pub court: String,
    pub date: String,
    #[serde(default)]
    pub outcome: Outcome,
    #[serde(default)]
    pub neutral_citation: Option<String>,
    #[serde(default)]
    pub reporter_citations: Option<Vec<String>>,
    #[serde(default)]
    pub issues: Option<Vec<String>>,
    /// Why the search matched this case.
    #[serde(default)]
    pub why: Option<String>,
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct CaseParties {
    #[serde(default)]
    pub appellant: Option<Vec<String>>,
    #[serde(default)]
    pub respondent: Option<Vec<String>>,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct CaseDoc {
    pub id: String,
    pub title: String,
    pub court: String,
    #[serde(default)]
    pub bench: Option<String>,
    pub date: String,
    #[serde(default)]
    pub outcome: Outcome,
    #[serde(default)]
    pub statutes: Vec<String>,
    #[serde(default)]
    pub neutral_citation: Option<String>,
    #[serde(default)]
    pub reporter_citations: Option<Vec<String>>,
    #[serde(default)]
    pub ratio_summary: Option<String>,
    #[serde(default)]
    pub parties: Option<CaseParties>,
    #[serde(default)]
    pub timeline: Vec<serde_json::Value>,
    #[serde(default)]
    pub orders: Vec<serde_json::Value>,
    #[serde(default)]
    pub citations: BTreeMap<String, Vec<serde_json::Value>>,
    #[serde(default)]
    pub similar: Vec<CaseStub>,
}

impl ApiClient {
    pub async fn search_cases(
        &self,
        query: &str,
        mode: SearchMode,
        filters: &SearchFilters,
    ) -> Result<Vec<CaseStub>, Error> {
        tracing::debug!("searching cases for {query:?} in mode {mode:?}");
        let req = self
            .request(Method::POST, "/cases/search")?
            .json(&SearchRequest {
                q: query,
                mode,
                filters,
            });
        self.send(req).await
    }

    pub async fn get_case(&self, id: &str) -> Result<CaseDoc, Error> {
        let mut url = self.url("/cases/")?;
        // ids can hold characters that must not be read as path separators
        url.path_segments_mut()
            .map_err(|_| Error::UrlInvalid {
                path: format!("/cases/{id}"),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .push(id);
        self.send(self.client.request(Method::GET, url)).await
    }
}
