//! Artificial-latency shim applied to a connection's outbound path
//!
//! Both the server and the client wrap their stream's write half in a
//! [`DelayedWriter`], so every hop of a round trip pays the delay once.
//! The receive path is untouched.

use log::debug;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::time::sleep;

/// Delay applied to every outbound message.
pub const SEND_DELAY: Duration = Duration::from_millis(200);

/// How often the dispatcher re-checks the head of the queue.
pub const DISPATCH_INTERVAL: Duration = Duration::from_millis(1);

/// Write half of a connection with every send deferred by a fixed delay.
///
/// `send` never blocks: it stamps the payload with a fire time and queues
/// it. A background dispatcher task performs the real writes in strict
/// enqueue order, each no earlier than its fire time. Cloning yields
/// another handle to the same queue and dispatcher.
#[derive(Clone)]
pub struct DelayedWriter {
    queue: Arc<Mutex<VecDeque<(Instant, Vec<u8>)>>>,
    alive: Arc<AtomicBool>,
    delay: Duration,
}

impl DelayedWriter {
    /// Wraps `writer` and spawns the dispatcher task for it.
    pub fn new<W>(writer: W, delay: Duration) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let queue: Arc<Mutex<VecDeque<(Instant, Vec<u8>)>>> =
            Arc::new(Mutex::new(VecDeque::new()));
        let alive = Arc::new(AtomicBool::new(true));

        let dispatch_queue = Arc::clone(&queue);
        let dispatch_alive = Arc::clone(&alive);

        tokio::spawn(async move {
            let mut writer = writer;

            while dispatch_alive.load(Ordering::Acquire) {
                let due = match dispatch_queue.lock() {
                    Ok(mut queued) => {
                        let head_due = queued
                            .front()
                            .map_or(false, |(fire_time, _)| *fire_time <= Instant::now());
                        if head_due {
                            queued.pop_front()
                        } else {
                            None
                        }
                    }
                    Err(_) => break,
                };

                match due {
                    Some((_, data)) => {
                        let failed = writer.write_all(&data).await.is_err()
                            || writer.flush().await.is_err();
                        if failed {
                            debug!("Delayed writer: underlying stream closed");
                            dispatch_alive.store(false, Ordering::Release);
                            break;
                        }
                    }
                    None => sleep(DISPATCH_INTERVAL).await,
                }
            }
            // Dropping the writer closes the underlying stream half;
            // anything still queued is discarded.
        });

        Self {
            queue,
            alive,
            delay,
        }
    }

    /// Schedules `data` for delivery after the configured delay.
    ///
    /// Returns false once the shim is closed or its stream has failed;
    /// the caller treats that as a dead connection.
    pub fn send(&self, data: Vec<u8>) -> bool {
        if !self.alive.load(Ordering::Acquire) {
            return false;
        }
        match self.queue.lock() {
            Ok(mut queued) => {
                queued.push_back((Instant::now() + self.delay, data));
                true
            }
            Err(_) => false,
        }
    }

    /// Stops the dispatcher and discards every undelivered message.
    pub fn close(&self) {
        self.alive.store(false, Ordering::Release);
        if let Ok(mut queued) = self.queue.lock() {
            queued.clear();
        }
    }

    pub fn is_closed(&self) -> bool {
        !self.alive.load(Ordering::Acquire)
    }
}
