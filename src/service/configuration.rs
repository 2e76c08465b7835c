use std::path::Path;

#[derive(Debug, thiserror::Error)]
#[error("unable to load configuration: {0}")]
pub struct Error(#[from] config::ConfigError);

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub api: crate::service::client::Configuration,
    #[serde(default)]
    pub session: crate::service::session::Configuration,
    #[serde(default)]
    pub engine: lexx_engine::Config,
}

impl Configuration {
    fn builder(path: &Path) -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("LEXX")
                    .prefix_separator("__")
                    .separator("__"),
            )
    }

    /// Reads the optional toml file at `path`, overridden by `LEXX__*` variables.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!("loading configuration from {path:?}");
        Ok(Self::builder(path).build()?.try_deserialize()?)
    }
}
