mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use cli::{Cli, Commands, OptimizeCommands};
use error::CliError;

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let subscriber = tracing_subscriber::FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = dispatch(cli.command);
    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            output::print_error_json(&err);
            std::process::exit(err.exit_code());
        }
    }
}

fn dispatch(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Optimize { command } => match command {
            OptimizeCommands::Allocate {
                fields,
                crops,
                weather,
                rules,
                horizon_start,
                horizon_end,
                profile,
                algorithm,
                enable_local_search,
                enable_alns,
                format,
                out,
            } => commands::allocate::run(
                &fields,
                &crops,
                &weather,
                rules.as_deref(),
                horizon_start,
                horizon_end,
                profile,
                algorithm,
                enable_local_search,
                enable_alns,
                format,
                out.as_deref(),
            ),
            OptimizeCommands::Period { field, crop, fields, crops, weather, window_start, window_end, format } => {
                commands::period::run(&field, &crop, &fields, &crops, &weather, window_start, window_end, format)
            }
            OptimizeCommands::Candidates { fields, crops, weather, horizon_start, horizon_end, profile, format } => {
                commands::candidates::run(&fields, &crops, &weather, horizon_start, horizon_end, profile, format)
            }
            OptimizeCommands::Adjust { result, moves, fields, crops, weather, rules, format, out } => {
                commands::adjust::run(&result, &moves, &fields, &crops, &weather, rules.as_deref(), format, out.as_deref())
            }
            OptimizeCommands::Progress { field, crop, crops, weather, start_date, as_of } => {
                commands::progress::run(&field, &crop, &crops, &weather, start_date, as_of)
            }
        },
    }
}
