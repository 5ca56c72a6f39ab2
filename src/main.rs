mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Generate { input, output, name, syntax } => {
            commands::generate(&input, &output, &name, &syntax)
        }
        Commands::Check { file, syntax } => commands::check(&file, &syntax),
        Commands::Patch { file, patches } => commands::patch(&file, &patches),
        Commands::Fix { file, syntax } => commands::fix(&file, &syntax),
        Commands::Extract { file, output, syntax } => {
            commands::extract(&file, output.as_deref(), &syntax)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
