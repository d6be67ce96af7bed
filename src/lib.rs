pub mod config;
pub mod connection;
pub mod cycle;
pub mod error;
pub mod mpd;
pub mod sink;
pub mod tags;
pub mod template;

use crate::config::Config;
use crate::connection::ConnectionManager;
use crate::cycle::RenderCycle;
use crate::sink::OutputSink;
use crate::template::Renderer;
use anyhow::Result;
use log::*;
use tokio::time::{self, MissedTickBehavior};

pub fn render_cycle(config: &Config) -> RenderCycle {
    let connection = ConnectionManager::new(config.endpoint(), config.timeout());
    RenderCycle::new(
        connection,
        config.format_spec(),
        Renderer::new(config.capacity),
    )
}

/// Runs one cycle per tick and hands each line to `sink`, until the sink fails.
pub async fn run(config: &Config, sink: &mut (dyn OutputSink + Send)) -> Result<()> {
    let mut cycle = render_cycle(config);
    let mut ticks = time::interval(config.interval());
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;

        trace!("rendering");
        let line = cycle.run().await;
        debug!("{:?}: {}", line.health, line.text);

        sink.emit(&line).await?;
    }
}
