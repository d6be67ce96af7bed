use anyhow::Result;
use log::*;
use mpdbar::config::read_config;
use mpdbar::sink::StdoutSink;

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "mpdbar.toml".to_string());
    let config = read_config(&path).await?;

    simple_logger::SimpleLogger::new()
        .with_level(config.log_level.parse()?)
        .init()?;

    info!("polling mpd at {}:{}", config.host, config.port);

    let mut sink = StdoutSink::stdout();
    mpdbar::run(&config, &mut sink).await
}
