use clap::Parser;
use setup_kced::adapters::runner::RunnerFiles;
use setup_kced::adapters::wrapper::run_wrapped;
use setup_kced::config::cli::{Cli, Command};
use setup_kced::utils::logger;
use setup_kced::{run_action, SetupError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.config.verbose);
    let files = RunnerFiles::from_env();

    match cli.command {
        Some(Command::Wrap { binary, args }) => match run_wrapped(&binary, &args, &files).await {
            Ok(code) => std::process::exit(code),
            Err(e) => fail(e),
        },
        None => {
            tracing::info!("Starting setup-kced");
            match run_action(&cli.config, files).await {
                Ok(installation) => {
                    tracing::info!(
                        "kced {} available at {}{}",
                        installation.plan.full_version,
                        installation.tool_dir.display(),
                        if installation.from_cache { " (cached)" } else { "" }
                    );
                }
                Err(e) => fail(e),
            }
        }
    }
}

fn fail(e: SetupError) -> ! {
    tracing::error!("{}", e);
    tracing::error!("Suggestion: {}", e.recovery_suggestion());

    // Surfaces the failure as a step annotation
    println!("::error::{}", e);
    std::process::exit(e.exit_code());
}
