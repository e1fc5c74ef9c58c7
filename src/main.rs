use kidshorts::{create_routes, Config, Generator};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let generator = Generator::from_config(&config);

    let app = create_routes(generator).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    tracing::info!("Listening on {}", config.addr);
    axum::Server::bind(&config.addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
