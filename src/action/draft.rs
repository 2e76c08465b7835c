use super::Context;
use lexx::service::export;
use lexx::Error;
use lexx_engine::DraftEditor;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got {input:?}")),
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>, Error> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        Error::InvalidArgument(format!("unable to read {}: {err}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|err| {
        Error::InvalidArgument(format!(
            "{} should be a json object of strings: {err}",
            path.display()
        ))
    })
}

fn now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// How to fill a draft and what to do with the result.
#[derive(clap::Args)]
pub(crate) struct Fill {
    /// Set a field value, can be repeated.
    #[clap(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    set: Vec<(String, String)>,
    /// Json file with the field values, applied before `--set`.
    #[clap(long = "values", value_name = "FILE")]
    values_file: Option<PathBuf>,
    /// Replace the draft text with the content of this file, switching to manual edition.
    #[clap(long)]
    content: Option<PathBuf>,
    /// Write the draft to this file instead of the standard output.
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Write the draft even when some fields are missing.
    #[clap(long)]
    force: bool,
    /// Keep the draft in the local history.
    #[clap(long)]
    save: bool,
}

impl Fill {
    fn apply(&self, ctx: &mut Context, mut editor: DraftEditor) -> Result<(), Error> {
        if let Some(ref path) = self.values_file {
            editor.set_fields(read_values(path)?);
        }
        editor.set_fields(self.set.iter().cloned());
        if let Some(ref path) = self.content {
            let content = std::fs::read_to_string(path).map_err(|err| {
                Error::InvalidArgument(format!("unable to read {}: {err}", path.display()))
            })?;
            if !editor.is_manual_edit() {
                editor.toggle_manual_edit();
            }
            editor.edit_content(content)?;
        }

        let missing = editor.missing_fields();
        if !missing.is_empty() {
            let labels: Vec<_> = missing.iter().map(|field| field.label.as_str()).collect();
            tracing::warn!("missing fields: {}", labels.join(", "));
        }

        match self.output {
            Some(ref path) => {
                export::write_draft(path, &editor, self.force)?;
                tracing::info!("draft written to {}", path.display());
            }
            None => println!("{}", editor.content()),
        }

        if self.save {
            ctx.session.push_draft(editor.snapshot());
            ctx.session.save()?;
            tracing::info!("draft saved as {}", editor.timestamp());
        }
        Ok(())
    }
}

#[derive(clap::Subcommand)]
pub(crate) enum Action {
    /// Start a draft from a template
    New {
        slug: String,
        #[command(flatten)]
        fill: Fill,
    },
    /// Let the server pick a template and adapt it to a described situation
    Generate {
        situation: String,
        #[command(flatten)]
        fill: Fill,
    },
    /// List the drafts kept locally
    History,
    /// Reopen a draft from the local history
    Resume {
        timestamp: i64,
        #[command(flatten)]
        fill: Fill,
    },
    /// Remove a draft from the local history
    Delete { timestamp: i64 },
    /// Manage the drafts stored by the server
    #[command(subcommand)]
    Remote(Remote),
}

#[derive(clap::Subcommand)]
pub(crate) enum Remote {
    /// List the drafts stored by the server
    List,
    /// Send a local draft to the server
    Push { timestamp: i64 },
    /// Replace the server copy of a local draft
    Update { timestamp: i64 },
    /// Delete a draft from the server
    Delete { timestamp: i64 },
}

impl Action {
    pub(crate) async fn execute(self, ctx: &mut Context) -> Result<(), Error> {
        match self {
            Self::New { slug, fill } => {
                let editor = ctx.engine.editor(&slug, now())?;
                fill.apply(ctx, editor)
            }
            Self::Generate { situation, fill } => {
                let situation = situation.trim();
                if situation.is_empty() {
                    return Err(Error::InvalidArgument("the situation is empty".into()));
                }
                let generated = ctx.task.run(ctx.client.generate_draft(situation)).await?;
                tracing::info!("adapted from {} ({})", generated.title, generated.slug);
                let editor = ctx.engine.adapted_editor(
                    &generated.slug,
                    &generated.title,
                    generated.body,
                    now(),
                );
                fill.apply(ctx, editor)
            }
            Self::History => {
                for saved in ctx.session.drafts() {
                    println!(
                        "{:<14} {:<32} {}",
                        saved.draft.timestamp,
                        saved.draft.slug,
                        saved.category.as_deref().unwrap_or("-")
                    );
                }
                Ok(())
            }
            Self::Resume { timestamp, fill } => {
                let saved = find_local(ctx, timestamp)?.clone();
                let editor = ctx.engine.resume(saved)?;
                fill.apply(ctx, editor)
            }
            Self::Delete { timestamp } => {
                if ctx.session.remove_draft(timestamp).is_none() {
                    return Err(Error::InvalidArgument(format!(
                        "no local draft with timestamp {timestamp}"
                    )));
                }
                ctx.session.save()?;
                tracing::info!("draft {timestamp} removed");
                Ok(())
            }
            Self::Remote(remote) => remote.execute(ctx).await,
        }
    }
}

impl Remote {
    async fn execute(self, ctx: &mut Context) -> Result<(), Error> {
        match self {
            Self::List => {
                let drafts = ctx.task.run(ctx.client.list_drafts()).await?;
                for draft in drafts {
                    println!("{:<14} {}", draft.timestamp, draft.slug);
                }
                Ok(())
            }
            Self::Push { timestamp } => {
                let saved = find_local(ctx, timestamp)?;
                ctx.task.run(ctx.client.save_draft(&saved.draft)).await?;
                tracing::info!("draft {timestamp} sent");
                Ok(())
            }
            Self::Update { timestamp } => {
                let saved = find_local(ctx, timestamp)?;
                ctx.task.run(ctx.client.update_draft(&saved.draft)).await?;
                tracing::info!("draft {timestamp} updated");
                Ok(())
            }
            Self::Delete { timestamp } => {
                ctx.task.run(ctx.client.delete_draft(timestamp)).await?;
                tracing::info!("draft {timestamp} deleted");
                Ok(())
            }
        }
    }
}

fn find_local(ctx: &Context, timestamp: i64) -> Result<&lexx_prelude::SavedDraft, Error> {
    ctx.session
        .get_draft(timestamp)
        .ok_or_else(|| Error::InvalidArgument(format!("no local draft with timestamp {timestamp}")))
}
