use super::Context;
use lexx::service::client::Profile;
use lexx::Error;

#[derive(clap::Args)]
pub(crate) struct Changes {
    #[clap(long)]
    full_name: Option<String>,
    #[clap(long)]
    professional_title: Option<String>,
    #[clap(long)]
    bar_number: Option<String>,
    #[clap(long)]
    company_name: Option<String>,
    #[clap(long)]
    email: Option<String>,
    #[clap(long)]
    phone: Option<String>,
    #[clap(long)]
    address: Option<String>,
    #[clap(long)]
    court_preferences: Option<String>,
    #[clap(long)]
    signature_block: Option<String>,
}

impl From<Changes> for Profile {
    fn from(value: Changes) -> Self {
        Profile {
            full_name: value.full_name,
            professional_title: value.professional_title,
            bar_number: value.bar_number,
            company_name: value.company_name,
            email: value.email,
            phone: value.phone,
            address: value.address,
            court_preferences: value.court_preferences,
            signature_block: value.signature_block,
        }
    }
}

#[derive(clap::Subcommand)]
pub(crate) enum Action {
    /// Print the profile
    Show,
    /// Change some fields of the profile
    Update(Changes),
    /// Delete the account, this cannot be undone
    Delete {
        /// Confirm the deletion.
        #[clap(long)]
        yes: bool,
    },
}

impl Action {
    pub(crate) async fn execute(self, ctx: &mut Context) -> Result<(), Error> {
        match self {
            Self::Show => {
                let profile = ctx.task.run(ctx.client.get_profile()).await?;
                let rows = [
                    ("full name", &profile.full_name),
                    ("title", &profile.professional_title),
                    ("bar number", &profile.bar_number),
                    ("company", &profile.company_name),
                    ("email", &profile.email),
                    ("phone", &profile.phone),
                    ("address", &profile.address),
                    ("courts", &profile.court_preferences),
                    ("signature", &profile.signature_block),
                ];
                for (label, value) in rows {
                    println!("{label:<12} {}", value.as_deref().unwrap_or("-"));
                }
                Ok(())
            }
            Self::Update(changes) => {
                let changes = Profile::from(changes);
                if changes.is_empty() {
                    return Err(Error::InvalidArgument("nothing to update".into()));
                }
                ctx.task.run(ctx.client.update_profile(&changes)).await?;
                tracing::info!("profile updated");
                Ok(())
            }
            Self::Delete { yes } => {
                if !yes {
                    return Err(Error::InvalidArgument(
                        "deleting the account cannot be undone, pass --yes to confirm".into(),
                    ));
                }
                ctx.task.run(ctx.client.delete_account()).await?;
                ctx.session.logout();
                ctx.client.set_token(None);
                ctx.session.save()?;
                tracing::info!("account deleted");
                Ok(())
            }
        }
    }
}
