use crate::cycle::{Health, StatusLine};
use anyhow::Result;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};

#[async_trait::async_trait]
pub trait OutputSink {
    async fn emit(&mut self, line: &StatusLine) -> Result<()>;
}

/// Writes `<health>\t<text>` lines for the host to pick up.
pub struct LineSink<W> {
    out: W,
}

pub type StdoutSink = LineSink<Stdout>;

impl StdoutSink {
    pub fn stdout() -> Self {
        LineSink::new(tokio::io::stdout())
    }
}

impl<W> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait::async_trait]
impl<W: AsyncWrite + Unpin + Send> OutputSink for LineSink<W> {
    async fn emit(&mut self, line: &StatusLine) -> Result<()> {
        let health = match line.health {
            Health::Good => "good",
            Health::Bad => "bad",
        };
        let text = line.text.replace('\n', " ");

        self.out
            .write_all(format!("{}\t{}\n", health, text).as_bytes())
            .await?;
        self.out.flush().await?;
        Ok(())
    }
}

/// Keeps every emitted line.
#[derive(Default)]
pub struct MemorySink {
    pub lines: Vec<StatusLine>,
}

#[async_trait::async_trait]
impl OutputSink for MemorySink {
    async fn emit(&mut self, line: &StatusLine) -> Result<()> {
        self.lines.push(line.clone());
        Ok(())
    }
}
