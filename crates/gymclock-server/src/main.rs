use tracing_subscriber::EnvFilter;

use gymclock_server::routes;
use gymclock_server::SupabaseClient;

struct ServerConfig {
    supabase_url: String,
    supabase_key: String,
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let supabase_url =
            std::env::var("SUPABASE_URL").map_err(|_| "SUPABASE_URL is not set")?;
        let supabase_key =
            std::env::var("SUPABASE_KEY").map_err(|_| "SUPABASE_KEY is not set")?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| format!("invalid PORT: {raw}"))?,
            Err(_) => 3000,
        };
        Ok(Self {
            supabase_url,
            supabase_key,
            port,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let client = SupabaseClient::new(config.supabase_url, config.supabase_key);

    match client.probe(routes::TODOS_TABLE).await {
        Ok(()) => tracing::info!("data store connection ok"),
        Err(err) => tracing::warn!(error = %err, "data store probe failed"),
    }

    let app = routes::router(client);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
