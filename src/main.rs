use cheap_flights::adapters::telegram::TelegramChannel;
use cheap_flights::domain::ports::Channel;
use cheap_flights::utils::logger::{self, LogFormat};
use cheap_flights::utils::validation::Validate;
use cheap_flights::{CliConfig, FlightBot};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(LogFormat::from_flag(cli.log_json), cli.verbose);

    tracing::info!("Starting cheap-flights bot");
    if cli.verbose {
        tracing::debug!("Config file: {:?}", cli.config);
    }

    let config = cli.resolve()?;

    // 驗證配置
    if let Err(e) = config.validate().and_then(|_| config.validate_telegram()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("cheap-flights/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let bot = Arc::new(FlightBot::from_config(&config, client.clone())?);
    let channel: Arc<dyn Channel> = Arc::new(TelegramChannel::new(
        client,
        &config.telegram.api_base,
        &config.telegram.token,
        Duration::from_secs(config.telegram.poll_timeout_secs),
    ));

    tokio::select! {
        result = bot.run(channel) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
    }

    Ok(())
}
