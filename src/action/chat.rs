use super::Context;
use lexx::Error;

#[derive(clap::Subcommand)]
pub(crate) enum Action {
    /// Ask the assistant, in a new chat unless `--chat-id` is given
    Send {
        prompt: String,
        #[clap(long)]
        chat_id: Option<String>,
    },
    /// List the previous chats
    List,
    /// Print the messages of a chat
    Show { id: String },
    /// Create an empty chat
    New,
    /// Delete a chat
    Delete { id: String },
    /// Give a chat a new title
    Rename { id: String, title: String },
}

impl Action {
    pub(crate) async fn execute(self, ctx: &mut Context) -> Result<(), Error> {
        match self {
            Self::Send { prompt, chat_id } => {
                if prompt.trim().is_empty() {
                    return Err(Error::InvalidArgument("the prompt is empty".into()));
                }
                let answer = ctx
                    .task
                    .run(ctx.client.send_prompt(&prompt, chat_id.as_deref()))
                    .await?;
                println!("{}", answer.answer);
                tracing::info!("chat {}", answer.chat_id);
                Ok(())
            }
            Self::List => {
                let chats = ctx.task.run(ctx.client.list_chats()).await?;
                for chat in chats {
                    println!(
                        "{:<26} {:<24} {}",
                        chat.id,
                        chat.created_at.as_deref().unwrap_or("-"),
                        chat.title
                    );
                }
                Ok(())
            }
            Self::Show { id } => {
                let messages = ctx.task.run(ctx.client.get_chat(&id)).await?;
                for message in messages {
                    println!("[{}]", message.role);
                    println!("{}", message.content);
                    println!();
                }
                Ok(())
            }
            Self::New => {
                let id = ctx.task.run(ctx.client.create_chat()).await?;
                println!("{id}");
                Ok(())
            }
            Self::Delete { id } => {
                if !ctx.task.run(ctx.client.delete_chat(&id)).await? {
                    tracing::warn!("chat {id} was not deleted");
                }
                Ok(())
            }
            Self::Rename { id, title } => {
                let title = title.trim();
                if title.is_empty() {
                    return Err(Error::InvalidArgument("the title is empty".into()));
                }
                if !ctx.task.run(ctx.client.rename_chat(&id, title)).await? {
                    tracing::warn!("chat {id} was not renamed");
                }
                Ok(())
            }
        }
    }
}
