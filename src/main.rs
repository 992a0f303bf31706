use clap::Parser;
use user_crud_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DATABASE_URL, JWT_SECRET_ACCESS_TOKEN, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = user_crud_api::cli::run(cli).await {
        match std::env::var("APP_DEBUG").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
