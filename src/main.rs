use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use reporter_relay::{
    config::Config, contacts::load_email_table, create_router, search::ReporterClient,
    utils::init_logger, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Load the PI contact table before accepting requests
    let email_table = load_email_table(&config.email_table.path);
    if email_table.is_absent() {
        warn!("Starting without PI email table, every PI will be reported as not found");
    } else if email_table.is_empty() {
        warn!(path = %config.email_table.path.display(), "PI email table has no rows");
    }

    let reporter = ReporterClient::new(&config.reporter)
        .map_err(|e| anyhow::anyhow!("Failed to build NIH RePORTER client: {}", e))?;

    // Create shared state
    let state = AppState {
        config: config.clone(),
        email_table: Arc::new(email_table),
        reporter,
    };

    let app = create_router(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    info!(
        environment = %config.server.environment,
        search_url = %config.reporter.search_url,
        "Server listening on {}",
        addr
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
