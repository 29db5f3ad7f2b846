use crate::game::SnapshotBuffer;
use log::{debug, info, warn};
use shared::epoch_millis;
use shared::latency::{DelayedWriter, SEND_DELAY};
use shared::protocol::{self, Command, Message};
use shared::Snapshot;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Connection to the arena server.
///
/// Outbound commands pass through the artificial-latency shim; inbound
/// frames are consumed by a background reader task that fills the snapshot
/// buffer. The external render loop only ever calls [`Client::current_state`]
/// and [`Client::send`].
pub struct Client {
    writer: DelayedWriter,
    buffer: Arc<Mutex<SnapshotBuffer>>,
    player_id: Arc<Mutex<Option<u32>>>,
    reader_task: JoinHandle<()>,
}

impl Client {
    pub async fn connect(addr: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let stream = TcpStream::connect(addr).await?;
        info!("Connected to server at {}", addr);

        let (read_half, write_half) = stream.into_split();
        let writer = DelayedWriter::new(write_half, SEND_DELAY);
        let buffer = Arc::new(Mutex::new(SnapshotBuffer::new()));
        let player_id: Arc<Mutex<Option<u32>>> = Arc::new(Mutex::new(None));

        let reader_buffer = Arc::clone(&buffer);
        let reader_player_id = Arc::clone(&player_id);

        let reader_task = tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        info!("Server closed the connection");
                        break;
                    }
                    Ok(_) => match protocol::decode(line.trim_end()) {
                        Some(Message::Connect { id }) => {
                            info!("Assigned player id {}", id);
                            *reader_player_id.lock().await = Some(id);
                        }
                        Some(Message::State { d }) => {
                            reader_buffer.lock().await.push(d);
                        }
                        Some(_) => {
                            warn!("Unexpected message type from server");
                        }
                        // Malformed frames are dropped silently.
                        None => {
                            debug!("Discarding malformed frame from server");
                        }
                    },
                    Err(e) => {
                        debug!("Read error: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            writer,
            buffer,
            player_id,
            reader_task,
        })
    }

    /// Identity assigned by the server; `None` until the greeting has made
    /// it through the delayed link.
    pub async fn player_id(&self) -> Option<u32> {
        *self.player_id.lock().await
    }

    /// Queues one input command on the delayed outbound path. Returns
    /// false once the connection is gone.
    pub fn send(&self, command: Command) -> bool {
        match protocol::encode(&Message::Input { d: command }) {
            Ok(frame) => self.writer.send(frame),
            Err(e) => {
                warn!("Failed to encode command: {}", e);
                false
            }
        }
    }

    /// Reconstructed state for rendering, delayed and interpolated.
    pub async fn current_state(&self) -> Option<Snapshot> {
        self.buffer.lock().await.current_state(epoch_millis())
    }

    pub async fn buffered_snapshots(&self) -> usize {
        self.buffer.lock().await.len()
    }

    /// Drops the outbound queue and stops the reader task.
    pub fn close(&self) {
        self.writer.close();
        self.reader_task.abort();
    }
}
