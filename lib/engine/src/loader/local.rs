use crate::store::Template;
use lexx_prelude::{MetadataWithTemplate, TemplateDefinition};
use std::fs::{read_dir, read_to_string, File};
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unable to read template directory: {0:?}")]
    DirectoryReadFailed(std::io::Error),
    #[error("Unable to open metadata file: {0:?}")]
    MetadataOpenFailed(std::io::Error),
    #[error("Unable to deserialize metadata file: {0:?}")]
    MetadataFormatInvalid(serde_json::Error),
    #[error("Metadata name {found} does not match directory {expected}")]
    MetadataNameMismatch { expected: String, found: String },
    #[error("Unable to open template file: {0:?}")]
    TemplateOpenFailed(std::io::Error),
}

/// Reads templates laid out as `<root>/<slug>/metadata.json`, the text being
/// embedded in the metadata or stored next to it.
#[derive(Debug)]
pub struct LocalLoader {
    root: PathBuf,
}

impl LocalLoader {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn find_by_name(&self, name: &str) -> Result<Template, Error> {
        tracing::debug!("loading template {}", name);
        let path = self.root.join(name).join("metadata.json");
        let metadata_file = File::open(path).map_err(|err| {
            metrics::counter!("template_error", "reason" => "metadata_not_found").increment(1);
            tracing::debug!("template loader error: metadata not found ({:?})", err);
            Error::MetadataOpenFailed(err)
        })?;
        let metadata_reader = BufReader::new(metadata_file);
        let metadata: MetadataWithTemplate = serde_json::from_reader(metadata_reader)
            .map_err(|err| {
                metrics::counter!("template_error", "reason" => "metadata_invalid").increment(1);
                tracing::debug!("template loader error: metadata invalid ({:?})", err);
                Error::MetadataFormatInvalid(err)
            })?;
        if metadata.inner.name != name {
            return Err(Error::MetadataNameMismatch {
                expected: name.to_string(),
                found: metadata.inner.name,
            });
        }
        let content = match metadata.template {
            TemplateDefinition::Embedded(inner) => inner.content,
            TemplateDefinition::Local(inner) => {
                let template_path = self.root.join(name).join(inner.path);
                read_to_string(template_path).map_err(|err| {
                    metrics::counter!("template_error", "reason" => "template_not_found")
                        .increment(1);
                    tracing::debug!("template loader error: template not found ({:?})", err);
                    Error::TemplateOpenFailed(err)
                })?
            }
        };
        Ok(Template::new(metadata.inner, content))
    }

    /// Loads every subdirectory of the root holding a `metadata.json`, by name.
    pub fn load_all(&self) -> Result<Vec<Template>, Error> {
        let mut names = Vec::new();
        for entry in read_dir(&self.root).map_err(Error::DirectoryReadFailed)? {
            let entry = entry.map_err(Error::DirectoryReadFailed)?;
            let path = entry.path();
            if !path.join("metadata.json").is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        names.iter().map(|name| self.find_by_name(name)).collect()
    }
}
