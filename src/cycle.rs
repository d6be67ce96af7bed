use crate::connection::ConnectionManager;
use crate::error::CycleError;
use crate::mpd::{PlayState, SongStatus};
use crate::template::{FormatSpec, Renderer};
use log::*;

/// Coarse classification of a cycle, left to the sink to present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Health {
    Good,
    Bad,
}

impl Health {
    pub fn of(outcome: &Result<SongStatus, CycleError>) -> Self {
        match outcome {
            Ok(song_status) if song_status.status.state == PlayState::Play => Health::Good,
            _ => Health::Bad,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub health: Health,
}

pub struct RenderCycle {
    connection: ConnectionManager,
    spec: FormatSpec,
    renderer: Renderer,
}

impl RenderCycle {
    pub fn new(connection: ConnectionManager, spec: FormatSpec, renderer: Renderer) -> Self {
        Self {
            connection,
            spec,
            renderer,
        }
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Produces this cycle's line. Every failure ends up as the fallback text with bad health.
    pub async fn run(&mut self) -> StatusLine {
        let outcome = self.fetch().await;

        match &outcome {
            Ok(song_status) => debug!("state: {:?}", song_status.status.state),
            Err(CycleError::Connection(err)) => warn!("mpd: no connection: {}", err),
            Err(CycleError::Query(err)) => warn!("mpd: {}", err),
        }

        self.connection.release_if_broken().await;

        let health = Health::of(&outcome);
        let song = outcome.as_ref().ok().map(|song_status| &song_status.song);

        match self.renderer.render(&self.spec, song) {
            Ok(text) => StatusLine { text, health },
            Err(err) => {
                warn!("{}, showing fallback", err);
                StatusLine {
                    text: self.renderer.truncated_fallback(&self.spec),
                    health: Health::Bad,
                }
            }
        }
    }

    async fn fetch(&mut self) -> Result<SongStatus, CycleError> {
        let timeout = self.connection.timeout();
        let mpd = self.connection.ensure().await?;
        Ok(mpd.song_status(timeout).await?)
    }
}
