use dining_review::api::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run_server().await
}
