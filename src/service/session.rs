//! Local state kept between two invocations: the bearer token, the signed in
//! user and the history of saved drafts.

use lexx_prelude::SavedDraft;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Configuration {
    #[serde(default = "Configuration::default_path")]
    pub path: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl Configuration {
    fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lexx")
            .join("session.json")
    }

    pub fn build(&self) -> Result<Session, Error> {
        Session::load(&self.path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to read session file {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to parse session file {path:?}: {source}")]
    FormatInvalid {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unable to write session file {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BearerToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BearerToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct PublicUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<BearerToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<PublicUser>,
    #[serde(default)]
    drafts: Vec<SavedDraft>,
}

/// Session backed by a json file, written back on [`Session::save`].
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    content: Content,
}

impl Session {
    /// Opens the session file, a missing file being an empty session.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let content = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                tracing::error!("session file {path:?} is invalid: {source:?}");
                Error::FormatInvalid {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no session file at {path:?}, starting empty");
                Content::default()
            }
            Err(source) => return Err(Error::ReadFailed { path, source }),
        };
        Ok(Self { path, content })
    }

    /// Writes the session next to its destination then moves it in place.
    pub fn save(&self) -> Result<(), Error> {
        let write_failed = |source: std::io::Error| Error::WriteFailed {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
        let bytes = serde_json::to_vec_pretty(&self.content).map_err(|err| {
            write_failed(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        })?;
        let tmp = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).map_err(write_failed)?;
        file.write_all(&bytes).map_err(write_failed)?;
        file.sync_all().map_err(write_failed)?;
        fs::rename(&tmp, &self.path).map_err(write_failed)?;
        tracing::debug!("session saved to {:?}", self.path);
        Ok(())
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.content.token.as_ref()
    }

    pub fn set_token(&mut self, token: BearerToken) {
        self.content.token = Some(token);
    }

    pub fn user(&self) -> Option<&PublicUser> {
        self.content.user.as_ref()
    }

    pub fn set_user(&mut self, user: PublicUser) {
        self.content.user = Some(user);
    }

    /// Forgets who is signed in, the draft history is kept.
    pub fn logout(&mut self) {
        self.content.token = None;
        self.content.user = None;
    }

    pub fn drafts(&self) -> &[SavedDraft] {
        &self.content.drafts
    }

    /// Adds a draft, replacing the one with the same timestamp.
    pub fn push_draft(&mut self, draft: SavedDraft) {
        let timestamp = draft.draft.timestamp;
        match self
            .content
            .drafts
            .iter_mut()
            .find(|item| item.draft.timestamp == timestamp)
        {
            Some(existing) => *existing = draft,
            None => self.content.drafts.push(draft),
        }
    }

    pub fn get_draft(&self, timestamp: i64) -> Option<&SavedDraft> {
        self.drafts()
            .iter()
            .find(|item| item.draft.timestamp == timestamp)
    }

    /// The most recent draft of a template.
    pub fn find_draft(&self, slug: &str) -> Option<&SavedDraft> {
        self.drafts()
            .iter()
            .filter(|item| item.draft.slug == slug)
            .max_by_key(|item| item.draft.timestamp)
    }

    pub fn remove_draft(&mut self, timestamp: i64) -> Option<SavedDraft> {
        let index = self
            .content
            .drafts
            .iter()
            .position(|item| item.draft.timestamp == timestamp)?;
        Some(self.content.drafts.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::{BearerToken, Error, PublicUser, Session};
    use lexx_prelude::{Draft, SavedDraft};

    fn draft(slug: &str, timestamp: i64) -> SavedDraft {
        SavedDraft {
            draft: Draft {
                slug: slug.into(),
                draft_content: format!("content of {slug}"),
                timestamp,
            },
            category: None,
            values: Default::default(),
        }
    }

    #[test]
    fn should_start_empty_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(dir.path().join("session.json")).unwrap();
        assert!(session.token().is_none());
        assert!(session.drafts().is_empty());
    }

    #[test]
    fn should_persist_between_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let mut session = Session::load(&path).unwrap();
        session.set_token(BearerToken::from("jwt"));
        session.set_user(PublicUser {
            email: "jane@example.com".into(),
            ..Default::default()
        });
        session.push_draft(draft("payment-reminder", 1));
        session.save().unwrap();

        let session = Session::load(&path).unwrap();
        assert_eq!(session.token().map(BearerToken::as_str), Some("jwt"));
        assert_eq!(session.user().unwrap().email, "jane@example.com");
        assert_eq!(session.drafts().len(), 1);
        assert!(!dir.path().join("nested").join("session.json.tmp").exists());
    }

    #[test]
    fn should_fail_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Session::load(&path).unwrap_err();
        assert!(matches!(err, Error::FormatInvalid { .. }));
    }

    #[test]
    fn should_manage_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::load(dir.path().join("session.json")).unwrap();
        session.push_draft(draft("payment-reminder", 1));
        session.push_draft(draft("payment-reminder", 3));
        session.push_draft(draft("lease-agreement", 2));
        assert_eq!(
            session.find_draft("payment-reminder").unwrap().draft.timestamp,
            3
        );
        let mut updated = draft("lease-agreement", 2);
        updated.draft.draft_content = "updated".into();
        session.push_draft(updated);
        assert_eq!(session.drafts().len(), 3);
        assert_eq!(session.get_draft(2).unwrap().draft.draft_content, "updated");

        assert!(session.remove_draft(3).is_some());
        assert!(session.remove_draft(3).is_none());
        assert_eq!(
            session.find_draft("payment-reminder").unwrap().draft.timestamp,
            1
        );
    }

    #[test]
    fn should_logout_but_keep_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::load(dir.path().join("session.json")).unwrap();
        session.set_token(BearerToken::from("jwt"));
        session.push_draft(draft("payment-reminder", 1));
        session.logout();
        assert!(session.token().is_none());
        assert_eq!(session.drafts().len(), 1);
    }

    #[test]
    fn should_hide_token_in_debug() {
        assert_eq!(format!("{:?}", BearerToken::from("jwt")), "BearerToken(***)");
    }
}
