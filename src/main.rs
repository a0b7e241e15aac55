#[tokio::main]
async fn main() {
    if let Err(e) = healthassist::run().await {
        eprintln!("healthassist: {e}");
        std::process::exit(1);
    }
}
