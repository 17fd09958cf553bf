use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use geolocator::cli::{Cli, Commands, ConfigCommands};
use geolocator::config::StaticConfig;
use geolocator::runtime::modes;
use geolocator::system::{RunMode, init_logging, install_panic_hook};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = StaticConfig::load(cli.config.as_deref())
                .context("Failed to load configuration")?;
            // guard 必须存活到进程结束，否则缓冲中的日志会丢失
            let _guard = init_logging(&config.logging)?;
            install_panic_hook(RunMode::server(&config.logging));

            tracing::info!("geolocator v{} starting", env!("CARGO_PKG_VERSION"));
            modes::run_server(config).await
        }
        Commands::Lookup { ip, lang } => {
            install_panic_hook(RunMode::Cli);

            let config = StaticConfig::load(cli.config.as_deref())
                .context("Failed to load configuration")?;
            if let Err(e) = modes::run_lookup(&config, &ip, lang.as_deref()).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Config {
            action: ConfigCommands::Generate { output_path },
        } => {
            install_panic_hook(RunMode::Cli);

            if let Err(e) = modes::generate_config(output_path.as_deref()) {
                eprintln!("{} {}", "✗".red().bold(), e.format_simple());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
