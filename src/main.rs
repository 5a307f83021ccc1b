use link_snap::{config, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;
    let _log_guard = logging::init(
        &config.log_level,
        &config.log_format,
        config.log_file.as_deref(),
    )?;
    config.print_summary();

    server::run(config).await
}
