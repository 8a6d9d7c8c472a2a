//! CLI command implementations

use clap::Subcommand;
use sluice_core::SluiceConfig;
use sluice_core::config::ServerConfig;
use sluice_core::resolve::MediaResolver;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to bind to (falls back to the PORT environment variable, then 8000)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Resolve a TikTok URL and print the normalized metadata
    Resolve {
        /// TikTok video URL
        url: String,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port } => serve(host, port).await,
        Commands::Resolve { url } => resolve(url).await,
    }
}

/// Start the gateway server
///
/// # Errors
/// - Listener failed to bind or the server failed while serving
async fn serve(host: String, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = SluiceConfig::default();
    config.server.host = host;
    config.server.port = ServerConfig::resolve_port(port);

    println!(
        "Sluice gateway running on http://{}:{}",
        config.server.host, config.server.port
    );
    println!("Press Ctrl+C to stop the server");

    sluice_web::run_server(config).await?;
    Ok(())
}

/// Resolve a URL once and print the result as pretty JSON
///
/// # Errors
/// - `GatewayError` - Resolution failed
async fn resolve(url: String) -> anyhow::Result<()> {
    let config = SluiceConfig::default();
    let resolver = MediaResolver::new(&config.upstream);

    let resolved = resolver.resolve(&url).await?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);

    Ok(())
}
