use tienda_server::{Config, Server, ServerState, init_logger, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();

    print_banner();
    tracing::info!("Tienda server starting...");

    let config = Config::from_env();
    let state = ServerState::initialize(config).await?;

    if let Err(e) = Server::new(state).run().await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
