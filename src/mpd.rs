use crate::error::{ConnectionError, QueryError};
use crate::tags::SongSnapshot;
use log::*;
use mpd_client::client::{CommandError, ConnectionEvent, ConnectionEvents};
use mpd_client::commands::{CurrentSong, Status};
use mpd_client::responses;
use mpd_client::Client;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Play,
    Pause,
    Stop,
}

impl From<responses::PlayState> for PlayState {
    fn from(state: responses::PlayState) -> Self {
        match state {
            responses::PlayState::Playing => PlayState::Play,
            responses::PlayState::Paused => PlayState::Pause,
            responses::PlayState::Stopped => PlayState::Stop,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub state: PlayState,
}

#[derive(Clone, Debug)]
pub struct SongStatus {
    pub song: SongSnapshot,
    pub status: StatusSnapshot,
}

/// One session with the server, plus whether it has been seen to fail.
pub struct Mpd {
    client: Client,
    events: ConnectionEvents,
    broken: bool,
}

impl Mpd {
    /// Connects to `addr` and authenticates if `password` is given, all within `limit`.
    pub async fn connect(
        addr: &str,
        password: Option<&str>,
        limit: Duration,
    ) -> Result<Self, ConnectionError> {
        let handshake = async {
            let stream = TcpStream::connect(addr)
                .await
                .map_err(|source| ConnectionError::Connect {
                    addr: addr.to_string(),
                    source,
                })?;

            Client::connect_with_password_opt(stream, password)
                .await
                .map_err(|err| ConnectionError::Handshake {
                    addr: addr.to_string(),
                    source: err.into(),
                })
        };

        let (client, events) = time::timeout(limit, handshake)
            .await
            .map_err(|_| ConnectionError::Timeout(addr.to_string()))??;

        Ok(Self {
            client,
            events,
            broken: false,
        })
    }

    pub fn protocol_version(&self) -> &str {
        self.client.protocol_version()
    }

    /// Consumes whatever connection events are already queued and reports whether the
    /// session is unusable, either from a close event or the client's own state. Never
    /// waits on the server.
    pub async fn is_broken(&mut self) -> bool {
        while !self.broken {
            match time::timeout(Duration::ZERO, self.events.next()).await {
                Err(_) => break,
                Ok(Some(ConnectionEvent::SubsystemChange(subsystem))) => {
                    trace!("ignoring change in {:?}", subsystem);
                }
                Ok(Some(ConnectionEvent::ConnectionClosed(err))) => {
                    debug!("connection closed: {}", err);
                    self.broken = true;
                }
                Ok(None) => {
                    debug!("connection closed");
                    self.broken = true;
                }
            }
        }

        self.broken = self.broken || self.client.is_connection_closed();
        self.broken
    }

    /// Fetches status and the current song in a single command list.
    ///
    /// The client reads every reply in the list through the closing `OK` before
    /// returning, so the session is framed correctly for the next exchange.
    pub async fn song_status(&mut self, limit: Duration) -> Result<SongStatus, QueryError> {
        trace!("sending status + currentsong");
        let reply = time::timeout(limit, self.client.command_list((Status, CurrentSong))).await;

        let (status, song) = match reply {
            Err(_) => {
                self.broken = true;
                return Err(QueryError::Timeout);
            }
            // ACKs end the list cleanly, so the session stays usable.
            Ok(Err(err @ CommandError::ErrorResponse { .. }))
                if matches!(&err, CommandError::ErrorResponse { error, .. } if error.command_index == 0) =>
            {
                return Err(QueryError::NoStatus(err.into()));
            }
            Ok(Err(err @ CommandError::ErrorResponse { .. })) => {
                return Err(QueryError::Protocol(err.into()));
            }
            Ok(Err(err)) => {
                self.broken = true;
                return Err(QueryError::Protocol(err.into()));
            }
            Ok(Ok(reply)) => reply,
        };

        let status = StatusSnapshot {
            state: status.state.into(),
        };
        let song = song.ok_or(QueryError::NoSong)?;

        Ok(SongStatus {
            song: SongSnapshot::from(&song.song),
            status,
        })
    }
}
