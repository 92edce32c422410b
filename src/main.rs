#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = tutor_rust::run().await {
        eprintln!("tutor-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
