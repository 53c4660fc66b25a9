use anyhow::Context;
use clap::{Parser, Subcommand};
use concert_genres::app::ports::{EventsProvider, HttpClientPort};
use concert_genres::config::Config;
use concert_genres::infra::http_client::ReqwestHttp;
use concert_genres::pipeline::GenrePipeline;
use concert_genres::server::{start_server, AppState};
use concert_genres::types::Fetched;
use concert_genres::{logging, metrics};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "concert_genres")]
#[command(about = "Hot genres of a metro area's concert calendar")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Port to listen on (defaults to PORT or 5000)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the pipeline once for a metro area and print the records as JSON
    Events {
        /// Songkick metro area id
        location_id: String,
    },
    /// Search Songkick locations by name
    Locations {
        /// Free-text location name
        name: String,
    },
}

fn build_pipeline(config: &Config) -> anyhow::Result<GenrePipeline> {
    let http: Arc<dyn HttpClientPort> = Arc::new(
        ReqwestHttp::new(config.pipeline.request_timeout()).context("failed to build HTTP client")?,
    );
    Ok(GenrePipeline::from_config(config, http)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;
    let pipeline = Arc::new(build_pipeline(&config)?);

    match cli.command {
        Commands::Serve { port } => {
            metrics::init_metrics();
            let port = port.unwrap_or(config.port);
            info!(port, "Starting server");
            if let Err(e) = start_server(AppState::new(pipeline), port).await {
                error!("Server error: {}", e);
                anyhow::bail!("server exited: {e}");
            }
        }
        Commands::Events { location_id } => {
            let records = pipeline.run(&location_id).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Locations { name } => {
            let body = match pipeline.events_provider().search_locations(&name).await? {
                Fetched::Data(body) => body,
                Fetched::Empty => serde_json::Value::Null,
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }
    Ok(())
}
