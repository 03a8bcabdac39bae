//! QuillGPT server binary: loads env config, initializes tracing, wires the
//! application state, and serves the axum router.

use anyhow::Result;
use server::{routes, AppState, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    config.validate()?;
    chat_core::init_tracing(&config.log_file)?;

    let bind_addr = config.bind_addr.clone();
    let state = AppState::build(config).await?;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "server is listening");
    axum::serve(listener, app).await?;

    Ok(())
}
