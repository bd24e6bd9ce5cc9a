#[tokio::main]
async fn main() -> anyhow::Result<()> {
    study_tracker_backend::run().await
}
