mod action;

use clap::Parser;
use lexx::service::configuration::Configuration;
use lexx::service::task::Task;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Command {
    /// Path to the configuration toml file.
    #[clap(short, long, default_value = "lexx.toml", env = "LEXX_CONFIG")]
    config: PathBuf,
    /// Log directive, for example `lexx=debug`.
    #[clap(long, default_value = "lexx=info,lexx_engine=info", env = "LOG")]
    log: String,
    #[command(subcommand)]
    action: action::Action,
}

impl Command {
    async fn run(self) -> Result<(), lexx::Error> {
        let config = Configuration::from_path(&self.config)?;
        let task = Task::default();
        let signal = task.cancel_on_signal();
        let result = self.action.execute(config, task.clone()).await;
        task.cancel();
        let _ = signal.await;
        result
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let command = Command::parse();
    if let Err(err) = lexx::init_logs(&command.log, std::io::stderr().is_terminal()) {
        eprintln!("unable to initialize logs: {err}");
    }
    match command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
