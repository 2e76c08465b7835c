use super::Context;
use lexx::service::client::Credentials;
use lexx::service::session::{BearerToken, PublicUser};
use lexx::Error;

#[derive(clap::Args)]
pub(crate) struct CredentialsArgs {
    #[clap(long, env = "LEXX_EMAIL")]
    email: String,
    #[clap(long, env = "LEXX_PASSWORD", hide_env_values = true)]
    password: String,
}

impl From<CredentialsArgs> for Credentials {
    fn from(value: CredentialsArgs) -> Self {
        Credentials {
            email: value.email,
            password: value.password,
        }
    }
}

#[derive(clap::Subcommand)]
pub(crate) enum Action {
    /// Sign in with an email and a password
    Login(CredentialsArgs),
    /// Create an account and sign in
    Signup(CredentialsArgs),
    /// Sign out and forget the token, local drafts are kept
    Logout,
    /// Show who is signed in
    Status,
    /// Print the address starting the Google sign-in
    Google,
    /// Store a token obtained from the Google sign-in
    Token { token: String },
}

impl Action {
    pub(crate) async fn execute(self, ctx: &mut Context) -> Result<(), Error> {
        match self {
            Self::Login(args) => {
                let credentials = Credentials::from(args);
                let token = ctx.task.run(ctx.client.login(&credentials)).await?;
                signed_in(ctx, token, credentials.email)
            }
            Self::Signup(args) => {
                let credentials = Credentials::from(args);
                let token = ctx.task.run(ctx.client.signup(&credentials)).await?;
                signed_in(ctx, token, credentials.email)
            }
            Self::Logout => {
                if let Err(err) = ctx.task.run(ctx.client.logout()).await {
                    tracing::warn!("server logout failed: {err}");
                }
                ctx.session.logout();
                ctx.client.set_token(None);
                ctx.session.save()?;
                tracing::info!("signed out");
                Ok(())
            }
            Self::Status => {
                if ctx.session.token().is_none() {
                    println!("not signed in");
                    return Ok(());
                }
                let status = ctx.task.run(ctx.client.session_status()).await?;
                match status.user() {
                    Some(user) => {
                        println!("signed in as {}", user.email);
                        if let Some(ref name) = user.name {
                            println!("name: {name}");
                        }
                        ctx.session.set_user(user);
                        ctx.session.save()?;
                    }
                    None => println!("token expired, sign in again"),
                }
                Ok(())
            }
            Self::Google => {
                let url = ctx.client.google_login_url()?;
                println!("open {url} in a browser, then run `lexx auth token <TOKEN>`");
                Ok(())
            }
            Self::Token { token } => {
                let token = BearerToken::from(token.trim());
                ctx.client.set_token(Some(token.clone()));
                ctx.session.set_token(token);
                let status = ctx.task.run(ctx.client.session_status()).await?;
                let user = status
                    .user()
                    .ok_or_else(|| Error::InvalidArgument("token rejected by the server".into()))?;
                tracing::info!("signed in as {}", user.email);
                ctx.session.set_user(user);
                ctx.session.save()?;
                Ok(())
            }
        }
    }
}

fn signed_in(ctx: &mut Context, token: BearerToken, email: String) -> Result<(), Error> {
    ctx.client.set_token(Some(token.clone()));
    ctx.session.set_token(token);
    tracing::info!("signed in as {email}");
    ctx.session.set_user(PublicUser {
        id: None,
        email,
        name: None,
        image: None,
    });
    ctx.session.save()?;
    Ok(())
}
