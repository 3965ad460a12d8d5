use clap::{CommandFactory, Parser};
use is_terminal::IsTerminal;
use socialgraph_cli::commands::{Cli, Commands};
use socialgraph_cli::context::SocialGraphCliContext;
use socialgraph_cli::output::*;
use tracing::Level;

#[tokio::main]
async fn main() {
    let cli_args = Cli::parse();
    let output = cli_args.output;

    // Machine output and non-terminal stdout get plain text
    if output.is_json() || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let is_quiet = cli_args.quiet
        || std::env::var("SOCIALGRAPH_QUIET")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

    let log_level = if is_quiet || output.is_json() {
        Level::ERROR
    } else if cli_args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli_args).await {
        output_error(&e, output);
        std::process::exit(1);
    }
}

async fn run(cli_args: Cli) -> socialgraph::Result<()> {
    let output = cli_args.output;

    if cli_args.command.is_offline() {
        match cli_args.command {
            Commands::Version => {
                if output.is_json() {
                    print_json(&serde_json::json!({ "version": socialgraph::VERSION }));
                } else {
                    println!("SocialGraph CLI v{}", socialgraph::VERSION);
                }
            }
            Commands::Completions(args) => {
                let shell: clap_complete::Shell = args.shell.into();
                let mut command = Cli::command();
                clap_complete::generate(shell, &mut command, "socialgraph", &mut std::io::stdout());
            }
            _ => {}
        }
        return Ok(());
    }

    let ctx = SocialGraphCliContext::new(cli_args.config, cli_args.data_dir, cli_args.memory).await?;

    ctx.execute(cli_args.command, output).await
}
