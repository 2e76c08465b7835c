use std::path::PathBuf;

pub mod local;

pub use local::{Error, LocalLoader};

/// Where to look for templates on top of the builtin ones.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn build(&self) -> Option<LocalLoader> {
        self.path.as_ref().map(|path| {
            tracing::debug!("building local template loader for {path:?}");
            LocalLoader::new(path.clone())
        })
    }
}
