use clap::Parser;
use lightning_fill::cli::commands::{cmd_capture, cmd_clear, cmd_fill, cmd_show};
use lightning_fill::cli::config::{Cli, Commands, load_config, resolve_notify_policy, resolve_store_path};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    lightning_fill::init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());

    // Storage path: CLI > config > default
    let store_path = resolve_store_path(cli.store.as_deref(), &config);

    let status = match cli.command {
        Commands::Capture { page } => {
            cmd_capture(&config, &store_path, page.as_deref(), cli.verbose).await?
        }
        Commands::Fill {
            page,
            output,
            notify,
        } => {
            let policy = resolve_notify_policy(notify.as_deref(), &config)?;
            cmd_fill(
                &config,
                &store_path,
                page.as_deref(),
                output.as_deref(),
                policy,
                cli.verbose,
            )
            .await?
        }
        Commands::Clear => cmd_clear(&config, &store_path, cli.verbose).await?,
        Commands::Show => {
            cmd_show(&config, &store_path).await?;
            return Ok(());
        }
    };

    if status.is_failure() {
        std::process::exit(1);
    }

    Ok(())
}
