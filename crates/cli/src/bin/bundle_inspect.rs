use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    bundle_cli::main_entry().await
}
