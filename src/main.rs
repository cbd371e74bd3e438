use anyhow::Result;
use clap::Parser;
use smelter::cli::{Cli, Commands};
use smelter::commands;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            fail_on,
        } => {
            let passed = commands::analyze::run(commands::analyze::AnalyzeConfig {
                path,
                format: format.into(),
                output,
                fail_on: fail_on.map(Into::into),
            })?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Fix {
            path,
            rule,
            batch,
            dry_run,
        } => commands::fix::run(commands::fix::FixConfig {
            path,
            rule,
            batch,
            dry_run,
        }),
        Commands::Init { force } => commands::init::init_config(force),
    }
}
