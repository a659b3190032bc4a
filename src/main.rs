use attendease_api::{config, database, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET
    let _ = dotenvy::dotenv();

    let config = config::config();
    config.validate()?;

    tracing_subscriber::fmt::init();

    tracing::info!("Starting AttendEase API in {:?} mode", config.environment);

    let pool = database::connect(&config.database).await?;
    database::run_migrations(&pool).await?;

    let app = routes::app(AppState { pool });

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    println!("🚀 AttendEase API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
