use shared::Snapshot;
use std::collections::VecDeque;

/// How far behind the newest server data the client renders. Larger than
/// the one-hop transport delay so two bracketing snapshots are almost
/// always available.
pub const INTERPOLATION_DELAY_MS: u64 = 250;

/// Maximum buffered snapshots; the oldest entry is evicted on overflow.
pub const BUFFER_CAPACITY: usize = 20;

/// Bounded history of timestamped snapshots plus the time-based
/// reconstruction used by the render path.
#[derive(Debug, Default)]
pub struct SnapshotBuffer {
    entries: VecDeque<(u64, Snapshot)>,
}

impl SnapshotBuffer {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(BUFFER_CAPACITY),
        }
    }

    /// Appends a snapshot keyed by its server timestamp, dropping the
    /// oldest entry when the buffer is full.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.len() == BUFFER_CAPACITY {
            self.entries.pop_front();
        }
        let timestamp = snapshot.time;
        self.entries.push_back((timestamp, snapshot));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reconstructs the state at `now - INTERPOLATION_DELAY_MS`.
    ///
    /// With a bracketing pair of snapshots the positions are blended
    /// linearly; outside the buffered history the nearest extreme snapshot
    /// is returned as-is. The buffer never extrapolates.
    pub fn current_state(&self, now_ms: u64) -> Option<Snapshot> {
        let render_time = now_ms.saturating_sub(INTERPOLATION_DELAY_MS);

        match self.entries.len() {
            0 => None,
            1 => Some(self.entries[0].1.clone()),
            _ => {
                for i in 0..self.entries.len() - 1 {
                    let (t_start, ref start) = self.entries[i];
                    let (t_end, ref end) = self.entries[i + 1];
                    if t_start <= render_time && render_time <= t_end {
                        return Some(interpolate(start, end, t_start, t_end, render_time));
                    }
                }

                // No pair brackets the render time: clamp to history.
                if render_time < self.entries[0].0 {
                    Some(self.entries[0].1.clone())
                } else {
                    self.entries.back().map(|(_, snapshot)| snapshot.clone())
                }
            }
        }
    }
}

/// Blends player positions between two snapshots. Discrete attributes
/// (score, shape, color) and the coin list come verbatim from the later
/// snapshot; a player missing from the earlier one passes through.
fn interpolate(
    start: &Snapshot,
    end: &Snapshot,
    t_start: u64,
    t_end: u64,
    render_time: u64,
) -> Snapshot {
    let span = t_end.saturating_sub(t_start);
    let fraction = if span > 0 {
        (render_time - t_start) as f32 / span as f32
    } else {
        0.0
    };

    let mut players = std::collections::HashMap::with_capacity(end.players.len());
    for (id, newer) in &end.players {
        let mut blended = newer.clone();
        if let Some(older) = start.players.get(id) {
            blended.x = older.x + (newer.x - older.x) * fraction;
            blended.y = older.y + (newer.y - older.y) * fraction;
        }
        players.insert(*id, blended);
    }

    Snapshot {
        time: render_time,
        players,
        coins: end.coins.clone(),
        status: end.status,
    }
}
