use lexx_engine::DraftEditor;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the draft is missing {}, fill them or force the export", .missing.join(", "))]
    Incomplete { missing: Vec<String> },
    #[error("unable to write {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// File name used when exporting a draft without an explicit destination.
pub fn default_file_name(slug: &str) -> String {
    format!("{slug}-draft.txt")
}

/// Writes the draft text, refusing drafts with unfilled fields unless forced.
pub fn write_draft(path: &Path, editor: &DraftEditor, force: bool) -> Result<(), Error> {
    if !force && !editor.is_complete() {
        let missing = editor
            .missing_fields()
            .into_iter()
            .map(|field| field.label.clone())
            .collect();
        return Err(Error::Incomplete { missing });
    }
    write_text(path, editor.content())
}

fn write_text(path: &Path, content: &str) -> Result<(), Error> {
    let mut content = content.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    std::fs::write(path, content).map_err(|source| {
        tracing::error!("unable to export draft to {path:?}: {source:?}");
        Error::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::info!("draft exported to {path:?}");
    Ok(())
}
