use crate::error::ConnectionError;
use crate::mpd::Mpd;
use log::*;
use std::time::Duration;

/// Where and how to reach the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub password: String,
}

impl Endpoint {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn password(&self) -> Option<&str> {
        if self.password.is_empty() {
            None
        } else {
            Some(&self.password)
        }
    }
}

/// Holds at most one session and recreates it when it breaks.
///
/// Requires `&mut self` for everything, so a single owner serialises all use.
pub struct ConnectionManager {
    endpoint: Endpoint,
    timeout: Duration,
    held: Option<Mpd>,
}

impl ConnectionManager {
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Self {
        Self {
            endpoint,
            timeout,
            held: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_connected(&self) -> bool {
        self.held.is_some()
    }

    /// Returns the held session, first dropping it if it has failed and reconnecting if
    /// nothing is held.
    pub async fn ensure(&mut self) -> Result<&mut Mpd, ConnectionError> {
        if let Some(mpd) = &mut self.held {
            if mpd.is_broken().await {
                info!("dropping broken mpd connection");
                self.held = None;
            }
        }

        let mpd = match self.held.take() {
            Some(mpd) => mpd,
            None => {
                let addr = self.endpoint.addr();
                debug!("connecting to {}", addr);
                let mut mpd = Mpd::connect(&addr, self.endpoint.password(), self.timeout).await?;
                if mpd.is_broken().await {
                    return Err(ConnectionError::Handshake {
                        addr,
                        source: "connection closed right after handshake".into(),
                    });
                }
                info!("connected to mpd {}", mpd.protocol_version());
                mpd
            }
        };

        Ok(self.held.insert(mpd))
    }

    /// Drops the held session if it failed during this cycle.
    pub async fn release_if_broken(&mut self) {
        if let Some(mpd) = &mut self.held {
            if mpd.is_broken().await {
                debug!("releasing broken mpd connection");
                self.held = None;
            }
        }
    }
}
