use super::Context;
use lexx::service::client::{ProcessedFile, SummaryLength};
use lexx::Error;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(crate) struct Summarize {
    /// Pdf, docx or text document.
    file: PathBuf,
    #[clap(long, value_enum, default_value_t)]
    length: SummaryLength,
}

impl Summarize {
    pub(crate) async fn execute(self, ctx: &mut Context) -> Result<(), Error> {
        let text = ctx.task.run(ctx.client.extract_text(&self.file)).await?;
        let summary = ctx
            .task
            .run(ctx.client.summarize(&text, self.length))
            .await?;
        println!("{summary}");
        Ok(())
    }
}

#[derive(clap::Args)]
pub(crate) struct Process {
    /// Pdf, docx or text document.
    file: PathBuf,
}

impl Process {
    pub(crate) async fn execute(self, ctx: &mut Context) -> Result<(), Error> {
        let text = ctx.task.run(ctx.client.extract_text(&self.file)).await?;
        match ctx.task.run(ctx.client.process_file(&text)).await? {
            ProcessedFile::Ok { chat_id } => {
                println!("{chat_id}");
                tracing::info!("continue with `lexx chat send --chat-id {chat_id} <PROMPT>`");
                Ok(())
            }
            ProcessedFile::TooLong { message, tokens } => Err(Error::InvalidArgument(
                message.unwrap_or_else(|| {
                    format!("the document is {tokens} tokens long, summarize it first with `lexx summarize`")
                }),
            )),
        }
    }
}
