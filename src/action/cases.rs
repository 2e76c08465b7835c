use super::Context;
use lexx::service::client::{Outcome, SearchFilters, SearchMode};
use lexx::Error;

fn outcome(value: Outcome) -> &'static str {
    match value {
        Outcome::Allowed => "allowed",
        Outcome::Dismissed => "dismissed",
        Outcome::Partly => "partly allowed",
        Outcome::Na => "-",
    }
}

#[derive(clap::Args)]
pub(crate) struct Filters {
    #[clap(long)]
    court: Option<String>,
    #[clap(long)]
    year_from: Option<String>,
    #[clap(long)]
    year_to: Option<String>,
    #[clap(long)]
    issue: Option<String>,
    #[clap(long)]
    outcome: Option<String>,
}

impl From<Filters> for SearchFilters {
    fn from(value: Filters) -> Self {
        SearchFilters {
            court: value.court,
            year_from: value.year_from,
            year_to: value.year_to,
            issue: value.issue,
            outcome: value.outcome,
        }
    }
}

#[derive(clap::Subcommand)]
pub(crate) enum Action {
    /// Search judgments by citation, party names or facts
    Search {
        query: String,
        #[clap(long, value_enum, default_value_t)]
        mode: SearchMode,
        #[command(flatten)]
        filters: Filters,
    },
    /// Print a judgment
    Show { id: String },
}

impl Action {
    pub(crate) async fn execute(self, ctx: &mut Context) -> Result<(), Error> {
        match self {
            Self::Search {
                query,
                mode,
                filters,
            } => {
                let filters = SearchFilters::from(filters);
                let cases = ctx
                    .task
                    .run(ctx.client.search_cases(&query, mode, &filters))
                    .await?;
                if cases.is_empty() {
                    println!("no matching case");
                }
                for case in cases {
                    println!("{}  {}", case.id, case.title);
                    println!("    {} | {} | {}", case.court, case.date, outcome(case.outcome));
                    if let Some(ref citation) = case.neutral_citation {
                        println!("    {citation}");
                    }
                    if let Some(ref why) = case.why {
                        println!("    {why}");
                    }
                }
                Ok(())
            }
            Self::Show { id } => {
                let case = ctx.task.run(ctx.client.get_case(&id)).await?;
                println!("{}", case.title);
                println!("{} | {} | {}", case.court, case.date, outcome(case.outcome));
                if let Some(ref bench) = case.bench {
                    println!("bench: {bench}");
                }
                if let Some(ref citation) = case.neutral_citation {
                    println!("citation: {citation}");
                }
                if let Some(ref parties) = case.parties {
                    if let Some(ref appellant) = parties.appellant {
                        println!("appellant: {}", appellant.join(", "));
                    }
                    if let Some(ref respondent) = parties.respondent {
                        println!("respondent: {}", respondent.join(", "));
                    }
                }
                if !case.statutes.is_empty() {
                    println!("statutes: {}", case.statutes.join("; "));
                }
                if let Some(ref summary) = case.ratio_summary {
                    println!();
                    println!("{summary}");
                }
                if !case.similar.is_empty() {
                    println!();
                    println!("similar cases:");
                    for similar in case.similar {
                        println!("  {}  {}", similar.id, similar.title);
                    }
                }
                Ok(())
            }
        }
    }
}
