mod auth;
mod cases;
mod chat;
mod draft;
mod profile;
mod summarize;
mod templates;

use lexx::service::client::{self, ApiClient};
use lexx::service::configuration::Configuration;
use lexx::service::session::{self, Session};
use lexx::service::task::Task;
use lexx::Error;
use lexx_engine::Engine;

/// What the commands going beyond the template store need: the session file
/// and a client carrying its token.
pub(crate) struct Context {
    pub engine: Engine,
    pub session: Session,
    pub client: ApiClient,
    pub task: Task,
}

impl Context {
    fn build(
        engine: Engine,
        api: &client::Configuration,
        session: &session::Configuration,
        task: Task,
    ) -> Result<Self, Error> {
        let session = session.build()?;
        let client = api.build()?.with_token(session.token().cloned());
        Ok(Self {
            engine,
            session,
            client,
            task,
        })
    }
}

#[derive(clap::Subcommand)]
pub(crate) enum Action {
    /// Browse and check the draft templates
    #[command(subcommand)]
    Templates(templates::Action),
    /// Fill, export and keep track of drafts
    #[command(subcommand)]
    Draft(draft::Action),
    /// Sign in, sign up and sign out
    #[command(subcommand)]
    Auth(auth::Action),
    /// Talk with the legal assistant
    #[command(subcommand)]
    Chat(chat::Action),
    /// Search the case law database
    #[command(subcommand)]
    Cases(cases::Action),
    /// Summarize a pdf, docx or text document
    Summarize(summarize::Summarize),
    /// Start a chat from a pdf, docx or text document
    Process(summarize::Process),
    /// Show, update or delete the professional profile
    #[command(subcommand)]
    Profile(profile::Action),
}

impl Action {
    /// Runs the command. Only the offline template commands skip the session.
    pub(crate) async fn execute(self, config: Configuration, task: Task) -> Result<(), Error> {
        let Configuration {
            api,
            session,
            engine,
        } = config;
        let engine = Engine::try_from(engine)?;
        let online = |engine: Engine| Context::build(engine, &api, &session, task.clone());
        match self {
            Self::Templates(inner) => inner.execute(&engine, &api, task.clone()).await,
            Self::Draft(inner) => inner.execute(&mut online(engine)?).await,
            Self::Auth(inner) => inner.execute(&mut online(engine)?).await,
            Self::Chat(inner) => inner.execute(&mut online(engine)?).await,
            Self::Cases(inner) => inner.execute(&mut online(engine)?).await,
            Self::Summarize(inner) => inner.execute(&mut online(engine)?).await,
            Self::Process(inner) => inner.execute(&mut online(engine)?).await,
            Self::Profile(inner) => inner.execute(&mut online(engine)?).await,
        }
    }
}
