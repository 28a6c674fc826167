use blogpress::{config::ServerConfig, server::serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    serve(ServerConfig::from_env()).await
}
