//! Server network layer handling TCP connections and the broadcast loop

use crate::game::GameState;
use crate::registry::ConnectionRegistry;
use log::{debug, info, warn};
use shared::latency::{DelayedWriter, SEND_DELAY};
use shared::protocol::{self, Message};
use shared::{epoch_millis, GameStatus};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Everything guarded by the single authoritative lock: the simulation
/// state and the live-connection registry. Keeping them under one lock
/// makes connection-count-dependent decisions (status, coin spawning)
/// atomic with the state they affect.
pub struct Store {
    pub game: GameState,
    pub connections: ConnectionRegistry,
}

/// Authoritative game server: accepts connections, feeds their inputs to
/// the simulation, and runs the fixed-cadence snapshot broadcast.
pub struct Server {
    listener: TcpListener,
    store: Arc<Mutex<Store>>,
    tick: Duration,
}

impl Server {
    /// Binds the listener and prepares an empty world.
    pub async fn bind(addr: &str, tick_rate: u32) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            store: Arc::new(Mutex::new(Store {
                game: GameState::new(epoch_millis()),
                connections: ConnectionRegistry::new(),
            })),
            tick: Duration::from_secs_f64(1.0 / tick_rate as f64),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop forever; the broadcast loop is spawned as its
    /// own task. Returns only on a listener error.
    pub async fn run(self) -> std::io::Result<()> {
        let store = Arc::clone(&self.store);
        let tick = self.tick;
        tokio::spawn(async move {
            broadcast_loop(store, tick).await;
        });

        loop {
            let (stream, addr) = self.listener.accept().await?;
            info!("New connection from {}", addr);

            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                handle_connection(stream, store).await;
            });
        }
    }
}

/// Owns one client from accept to disconnect: registers the player, sends
/// the greeting, then pumps inbound frames into the input policy.
async fn handle_connection(stream: TcpStream, store: Arc<Mutex<Store>>) {
    let (read_half, write_half) = stream.into_split();
    let writer = DelayedWriter::new(write_half, SEND_DELAY);

    let player_id = {
        let mut store = store.lock().await;
        let id = store.game.add_player();
        store.connections.insert(id, writer.clone());

        // Queue the greeting before releasing the lock so the broadcast
        // loop cannot slip a snapshot ahead of it in the delayed FIFO;
        // send() only enqueues, it never performs I/O.
        match protocol::encode(&Message::Connect { id }) {
            Ok(frame) => {
                writer.send(frame);
            }
            Err(e) => warn!("Failed to encode greeting for player {}: {}", id, e),
        }
        id
    };

    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("Player {} closed the connection", player_id);
                break;
            }
            Ok(_) => match protocol::decode(line.trim_end()) {
                Some(Message::Input { d }) => {
                    let now = epoch_millis();
                    let mut store = store.lock().await;
                    store.game.apply_command(player_id, d, now);
                }
                Some(_) => {
                    warn!("Unexpected message type from player {}", player_id);
                }
                // Malformed frames are dropped without a reply.
                None => {
                    debug!("Discarding malformed frame from player {}", player_id);
                }
            },
            Err(e) => {
                debug!("Read error from player {}: {}", player_id, e);
                break;
            }
        }
    }

    let mut store = store.lock().await;
    store.game.remove_player(player_id);
    if let Some(writer) = store.connections.remove(player_id) {
        writer.close();
    }
}

/// Fixed-cadence simulation and fan-out. Each tick runs the coin logic
/// (only with two live connections), builds one snapshot under the lock,
/// and sends the serialized bytes to every connection outside it.
async fn broadcast_loop(store: Arc<Mutex<Store>>, tick: Duration) {
    loop {
        let started = Instant::now();

        let (frame, senders) = {
            let mut store = store.lock().await;
            let status = if store.connections.len() < 2 {
                GameStatus::Waiting
            } else {
                GameStatus::Playing
            };

            if status == GameStatus::Playing {
                let now = epoch_millis();
                let mut rng = rand::thread_rng();
                store.game.spawn_coins(now, &mut rng);
                store.game.resolve_pickups();
            }

            let snapshot = store.game.snapshot(status);
            (
                protocol::encode(&Message::State { d: snapshot }),
                store.connections.senders(),
            )
        };

        // send() only queues, so no network I/O happens under the lock; a
        // false return means that connection's dispatcher has died.
        if let Ok(frame) = frame {
            let mut failed = Vec::new();
            for (id, sender) in senders {
                if !sender.send(frame.clone()) {
                    failed.push(id);
                }
            }

            if !failed.is_empty() {
                let mut store = store.lock().await;
                for id in failed {
                    warn!("Dropping dead connection for player {}", id);
                    if let Some(writer) = store.connections.remove(id) {
                        writer.close();
                    }
                }
            }
        }

        sleep(tick.saturating_sub(started.elapsed())).await;
    }
}
