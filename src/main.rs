//! Hospital management REST server binary.
//!
//! Resolves the configuration from the environment, opens the database,
//! creates the schema and serves the REST API.
//!
//! # Environment Variables
//! - `HOSPITAL_DATABASE_URL`: SQLite URL (default: "sqlite://hospital.db")
//! - `HOSPITAL_LISTEN_ADDR`: server address (default: "0.0.0.0:3000")

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{app, AppState};
use hospital_core::{db, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hospital=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env_values(
        std::env::var("HOSPITAL_DATABASE_URL").ok(),
        std::env::var("HOSPITAL_LISTEN_ADDR").ok(),
    )?;

    tracing::info!("++ Opening database at {}", config.database_url());
    let pool = db::connect(config.database_url()).await?;
    db::init_schema(&pool).await?;

    tracing::info!("++ Starting hospital REST API on {}", config.listen_addr());
    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    axum::serve(listener, app(AppState::new(pool))).await?;

    Ok(())
}
