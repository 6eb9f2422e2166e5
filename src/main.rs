use std::process::ExitCode;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{CommandFactory as _, Parser as _};

use devenv_cli::cli::{Cli, Command};
use devenv_cli::error::DevenvError;
use devenv_cli::exec::SystemExecutor;
use devenv_cli::logging::{self, Log, Logger};
use devenv_cli::{commands, report};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let rendered = e.render().to_string();
            let message = rendered.trim().trim_start_matches("error: ");
            eprintln!("{}", DevenvError::Parse(message.to_string()));
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "devenv", &mut std::io::stdout());
            ExitCode::SUCCESS
        }
        Command::Version => {
            commands::version::run();
            ExitCode::SUCCESS
        }
        ref command => {
            let config = match commands::resolve_config(command, &args.global, args.verbose) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{}: {e:#}", report::colorize("error", report::Style::Error));
                    return ExitCode::FAILURE;
                }
            };
            logging::init_subscriber(&config, command.log_name());
            let log: Arc<dyn Log> = Arc::new(Logger::new(command.log_name()));
            match commands::run(command, config, Arc::clone(&log), Arc::new(SystemExecutor)) {
                Ok(result) => report::report(&result, log.as_ref()),
                Err(e) => {
                    log.error(&format!("{e:#}"));
                    ExitCode::FAILURE
                }
            }
        }
    }
}
