use log::{debug, info};
use rand::Rng;
use shared::protocol::Command;
use shared::{
    epoch_millis, Aabb, Coin, CoinKind, GameStatus, Player, Shape, Snapshot, ARENA_HEIGHT,
    ARENA_WIDTH, BOUNCE_DISTANCE, COIN_SIZE, COIN_SPAWN_INTERVAL_MS, COMMAND_RATE_LIMIT,
    MAX_COINS, MOVE_STEP, PLAYER_SIZE, RATE_WINDOW_MS, STUN_DURATION_MS,
};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct GameState {
    pub players: HashMap<u32, Player>,
    pub coins: Vec<Coin>,
    next_player_id: u32,
    next_coin_id: u32,
    last_coin_spawn: u64,
}

impl GameState {
    pub fn new(now_ms: u64) -> Self {
        Self {
            players: HashMap::new(),
            coins: Vec::new(),
            next_player_id: 1,
            next_coin_id: 1,
            last_coin_spawn: now_ms,
        }
    }

    pub fn add_player(&mut self) -> u32 {
        let id = self.next_player_id;
        self.next_player_id += 1;

        let shape = Shape::from_join_order(self.players.len());
        let player = Player::new(id, shape);
        info!(
            "Player {} joined as {:?} at ({}, {})",
            id, player.shape, player.x, player.y
        );
        self.players.insert(id, player);
        id
    }

    pub fn remove_player(&mut self, id: u32) {
        if self.players.remove(&id).is_some() {
            info!("Player {} removed", id);
        }
    }

    /// Applies one input command under the anti-cheat policy. Every
    /// rejection is a silent no-op; nothing is reported back to the sender.
    pub fn apply_command(&mut self, id: u32, command: Command, now_ms: u64) {
        let accepted = match self.players.get_mut(&id) {
            // Already disconnected, nothing to do.
            None => return,
            Some(player) => {
                if now_ms < player.stun_until {
                    return;
                }

                // Rolling 1s window: the counter resets when the window
                // elapses, and commands beyond the cap are dropped.
                if now_ms.saturating_sub(player.window_start) >= RATE_WINDOW_MS {
                    player.packet_count = 0;
                    player.window_start = now_ms;
                }
                player.packet_count += 1;
                player.packet_count <= COMMAND_RATE_LIMIT
            }
        };

        if !accepted {
            return;
        }

        match command {
            Command::Reset => self.reset(),
            // Accepted by the protocol, currently has no movement effect.
            Command::Dash => {}
            Command::Up | Command::Down | Command::Left | Command::Right => {
                self.step_player(id, command, now_ms)
            }
        }
    }

    /// Clears all coins and returns every player to their start position
    /// with a zero score. Stun and rate-limit state are left untouched.
    fn reset(&mut self) {
        info!("Game reset: clearing coins and scores");
        self.coins.clear();
        for player in self.players.values_mut() {
            player.score = 0;
            let (x, y) = player.shape.spawn_position();
            player.x = x;
            player.y = y;
        }
    }

    fn step_player(&mut self, id: u32, direction: Command, now_ms: u64) {
        let (mut nx, mut ny) = match self.players.get(&id) {
            Some(player) => (player.x, player.y),
            None => return,
        };

        match direction {
            Command::Up => ny -= MOVE_STEP,
            Command::Down => ny += MOVE_STEP,
            Command::Left => nx -= MOVE_STEP,
            Command::Right => nx += MOVE_STEP,
            _ => return,
        }
        nx = nx.clamp(0.0, ARENA_WIDTH - PLAYER_SIZE);
        ny = ny.clamp(0.0, ARENA_HEIGHT - PLAYER_SIZE);

        let candidate = Aabb::new(nx, ny, PLAYER_SIZE, PLAYER_SIZE);
        let blocked = self
            .players
            .iter()
            .any(|(other_id, other)| *other_id != id && candidate.intersects(&other.bounds()));

        if let Some(player) = self.players.get_mut(&id) {
            if !blocked {
                player.x = nx;
                player.y = ny;
                return;
            }

            // The candidate is not committed: bounce the mover back
            // opposite its direction of travel and stun it.
            match direction {
                Command::Up => player.y += BOUNCE_DISTANCE,
                Command::Down => player.y -= BOUNCE_DISTANCE,
                Command::Left => player.x += BOUNCE_DISTANCE,
                Command::Right => player.x -= BOUNCE_DISTANCE,
                _ => {}
            }
            player.x = player.x.clamp(0.0, ARENA_WIDTH - PLAYER_SIZE);
            player.y = player.y.clamp(0.0, ARENA_HEIGHT - PLAYER_SIZE);
            player.stun_until = now_ms + STUN_DURATION_MS;
            debug!("Player {} bounced, stunned until {}", id, player.stun_until);
        }
    }

    /// Spawns at most one coin per call, and only once the spawn interval
    /// has elapsed while the population is under the cap.
    pub fn spawn_coins(&mut self, now_ms: u64, rng: &mut impl Rng) {
        if self.coins.len() >= MAX_COINS {
            return;
        }
        if now_ms.saturating_sub(self.last_coin_spawn) <= COIN_SPAWN_INTERVAL_MS {
            return;
        }

        let coin = Coin {
            id: self.next_coin_id,
            x: rng.gen_range(0..=(ARENA_WIDTH - COIN_SIZE) as i32),
            y: rng.gen_range(0..=(ARENA_HEIGHT - COIN_SIZE) as i32),
            kind: weighted_kind(rng),
        };
        self.next_coin_id += 1;
        debug!(
            "Spawned {:?} coin {} at ({}, {})",
            coin.kind, coin.id, coin.x, coin.y
        );
        self.coins.push(coin);
        self.last_coin_spawn = now_ms;
    }

    /// Awards overlapping coins to players and removes them. Players are
    /// visited in ascending id order, so when two players cover the same
    /// coin on the same tick the lowest id wins.
    pub fn resolve_pickups(&mut self) {
        let mut ids: Vec<u32> = self.players.keys().copied().collect();
        ids.sort_unstable();

        for id in ids {
            let bounds = match self.players.get(&id) {
                Some(player) => player.bounds(),
                None => continue,
            };

            let mut collected = 0u32;
            self.coins.retain(|coin| {
                if bounds.intersects(&coin.bounds()) {
                    collected += coin.kind.value();
                    false
                } else {
                    true
                }
            });

            if collected > 0 {
                if let Some(player) = self.players.get_mut(&id) {
                    player.score += collected;
                    debug!("Player {} collected {} points", id, collected);
                }
            }
        }
    }

    pub fn snapshot(&self, status: GameStatus) -> Snapshot {
        Snapshot {
            time: epoch_millis(),
            players: self.players.clone(),
            coins: self.coins.clone(),
            status,
        }
    }
}

/// Coin types are drawn 3:2:1 for Light:Pastel:Dark.
fn weighted_kind(rng: &mut impl Rng) -> CoinKind {
    match rng.gen_range(0..6) {
        0..=2 => CoinKind::Light,
        3..=4 => CoinKind::Pastel,
        _ => CoinKind::Dark,
    }
}
