use lexx::service::client;
use lexx::service::task::Task;
use lexx::Error;
use lexx_engine::Engine;

#[derive(clap::Subcommand)]
pub(crate) enum Action {
    /// List the available templates
    List {
        /// Only list the templates of this category.
        #[clap(long)]
        category: Option<String>,
    },
    /// Show the fields and the text of a template
    Show { slug: String },
    /// Check that placeholders and fields match for every template
    Check,
    /// Ask the server which templates fit a described situation
    Suggest { query: String },
}

impl Action {
    pub(crate) async fn execute(
        self,
        engine: &Engine,
        api: &client::Configuration,
        task: Task,
    ) -> Result<(), Error> {
        let store = engine.store();
        match self {
            Self::List { category } => {
                let templates: Vec<_> = match category {
                    Some(ref category) => store.by_category(category).collect(),
                    None => store.list().collect(),
                };
                for template in templates {
                    println!(
                        "{:<32} {:<12} {}",
                        template.slug(),
                        template.metadata.category,
                        template.metadata.title
                    );
                    if let Some(ref description) = template.metadata.description {
                        println!("{:<32} {:<12} {}", "", "", description);
                    }
                }
                Ok(())
            }
            Self::Show { slug } => {
                let template = store
                    .get(&slug)
                    .ok_or_else(|| lexx_engine::Error::NotFound(slug.clone()))?;
                println!("{} ({})", template.metadata.title, template.slug());
                println!();
                for field in template.fields() {
                    println!("  {:<28} {}", field.key, field.label);
                }
                println!();
                println!("{}", template.content);
                Ok(())
            }
            Self::Check => {
                store.validate()?;
                println!(
                    "{} templates checked, placeholders and fields match",
                    store.len()
                );
                Ok(())
            }
            Self::Suggest { query } => {
                if query.trim().is_empty() {
                    return Err(Error::InvalidArgument("the query is empty".into()));
                }
                let client = api.build()?;
                let found = task.run(client.suggest_templates(query.trim())).await?;
                if found.is_empty() {
                    println!("no matching template");
                }
                for suggestion in found {
                    let known = match store.get(&suggestion.slug) {
                        Some(_) => "",
                        None => " (not installed)",
                    };
                    println!("{:<32} {}{known}", suggestion.slug, suggestion.title);
                    if let Some(ref description) = suggestion.description {
                        println!("{:<32} {}", "", description);
                    }
                }
                Ok(())
            }
        }
    }
}
