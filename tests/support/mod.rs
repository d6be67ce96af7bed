use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// What the fake server answers with. Changing it affects the next command list.
#[derive(Clone, Debug)]
pub struct Behavior {
    pub state: &'static str,
    pub song: Option<Vec<(&'static str, &'static str)>>,
    pub password: Option<&'static str>,
    pub reject_status: bool,
    pub reject_song: bool,
    pub stall_lists: bool,
    pub hang_up_after_list: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            state: "play",
            song: Some(vec![
                ("file", "rock/a.mp3"),
                ("Title", "Song A"),
                ("Artist", "Band"),
                ("Album", "Record"),
            ]),
            password: None,
            reject_status: false,
            reject_song: false,
            stall_lists: false,
            hang_up_after_list: false,
        }
    }
}

pub struct FakeMpd {
    pub addr: SocketAddr,
    behavior: Arc<Mutex<Behavior>>,
    connections: Arc<AtomicUsize>,
}

impl FakeMpd {
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let behavior = Arc::new(Mutex::new(behavior));
        let connections = Arc::new(AtomicUsize::new(0));

        let shared = behavior.clone();
        let counter = connections.clone();
        tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(x) => x,
                    Err(_) => return,
                };
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(serve(stream, shared.clone()));
            }
        });

        Self {
            addr,
            behavior,
            connections,
        }
    }

    pub fn set(&self, update: impl FnOnce(&mut Behavior)) {
        update(&mut self.behavior.lock().unwrap());
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

async fn serve(stream: TcpStream, behavior: Arc<Mutex<Behavior>>) {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    if write.write_all(b"OK MPD 0.23.5\n").await.is_err() {
        return;
    }

    let mut session = Session::default();
    while let Ok(Some(line)) = lines.next_line().await {
        let (reply, hang_up) = session.handle(&line, &behavior);
        if let Some(reply) = reply {
            if write.write_all(reply.as_bytes()).await.is_err() {
                return;
            }
        }
        if hang_up {
            return;
        }
    }
}

#[derive(Default)]
struct Session {
    idle: bool,
    list: Option<Vec<String>>,
}

impl Session {
    /// Returns the reply to send, if any, and whether to close the connection afterwards.
    fn handle(&mut self, line: &str, behavior: &Mutex<Behavior>) -> (Option<String>, bool) {
        if line == "command_list_ok_begin" || line == "command_list_begin" {
            self.list = Some(Vec::new());
            return (None, false);
        }

        if line == "command_list_end" {
            self.list = None;
            let behavior = behavior.lock().unwrap().clone();
            if behavior.stall_lists {
                return (None, false);
            }
            return (Some(list_reply(&behavior)), behavior.hang_up_after_list);
        }

        if let Some(commands) = &mut self.list {
            commands.push(line.to_string());
            return (None, false);
        }

        if line.starts_with("idle") {
            self.idle = true;
            return (None, false);
        }

        if line == "noidle" {
            if !self.idle {
                return (None, false);
            }
            self.idle = false;
            return (Some("OK\n".to_string()), false);
        }

        if let Some(given) = line.strip_prefix("password ") {
            let given = given.trim_matches('"');
            let expected = behavior.lock().unwrap().password;
            return match expected {
                Some(expected) if expected != given => (
                    Some("ACK [3@0] {password} incorrect password\n".to_string()),
                    false,
                ),
                _ => (Some("OK\n".to_string()), false),
            };
        }

        (Some("OK\n".to_string()), false)
    }
}

fn list_reply(behavior: &Behavior) -> String {
    if behavior.reject_status {
        return "ACK [5@0] {status} unknown failure\n".to_string();
    }

    let mut reply = String::from(
        "partition: default\nvolume: 80\nrepeat: 0\nrandom: 0\nsingle: 0\nconsume: 0\nplaylist: 2\nmixrampdb: 0.000000\n",
    );
    reply.push_str(&format!("state: {}\n", behavior.state));

    if behavior.reject_song {
        reply.push_str("playlistlength: 1\nlist_OK\nACK [5@1] {currentsong} unknown failure\n");
        return reply;
    }

    match &behavior.song {
        Some(song) => {
            reply.push_str("playlistlength: 1\nsong: 0\nsongid: 1\n");
            if behavior.state != "stop" {
                reply.push_str("time: 10:200\nelapsed: 10.000\nbitrate: 320\nduration: 200.000\naudio: 44100:24:2\n");
            }
            reply.push_str("list_OK\n");
            for (key, value) in song {
                reply.push_str(&format!("{}: {}\n", key, value));
            }
            reply.push_str("duration: 200.000\nTime: 200\nPos: 0\nId: 1\n");
        }
        None => {
            reply.push_str("playlistlength: 0\nlist_OK\n");
        }
    }

    reply.push_str("list_OK\nOK\n");
    reply
}
