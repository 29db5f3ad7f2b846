use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub mod latency;
pub mod protocol;

pub const ARENA_WIDTH: f32 = 700.0;
pub const ARENA_HEIGHT: f32 = 800.0;
pub const PLAYER_SIZE: f32 = 40.0;
pub const COIN_SIZE: f32 = 20.0;
pub const TICK_RATE: u32 = 60;
pub const MAX_COINS: usize = 15;
pub const COIN_SPAWN_INTERVAL_MS: u64 = 3_000;
pub const MOVE_STEP: f32 = 4.0;
pub const BOUNCE_DISTANCE: f32 = 40.0;
pub const STUN_DURATION_MS: u64 = 300;
pub const COMMAND_RATE_LIMIT: u32 = 70;
pub const RATE_WINDOW_MS: u64 = 1_000;

/// Milliseconds since the Unix epoch, the timebase for snapshots and stuns.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}

/// Axis-aligned bounding box used for every overlap test in the game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap: boxes that merely touch edges do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Square,
    Triangle,
}

impl Shape {
    /// Shape assignment cycles by join order: even joins get the square.
    pub fn from_join_order(order: usize) -> Self {
        if order % 2 == 0 {
            Shape::Square
        } else {
            Shape::Triangle
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Shape::Square => (139, 218, 255),
            Shape::Triangle => (255, 255, 255),
        }
    }

    /// Start coordinates: squares on the left edge, triangles on the right.
    pub fn spawn_position(&self) -> (f32, f32) {
        let y = ARENA_HEIGHT / 2.0 - 20.0;
        match self {
            Shape::Square => (100.0, y),
            Shape::Triangle => (ARENA_WIDTH - 140.0, y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinKind {
    Light,
    Pastel,
    Dark,
}

impl CoinKind {
    pub fn value(&self) -> u32 {
        match self {
            CoinKind::Light => 5,
            CoinKind::Pastel => 10,
            CoinKind::Dark => 20,
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            CoinKind::Light => (188, 236, 255),
            CoinKind::Pastel => (4, 212, 244),
            CoinKind::Dark => (16, 99, 255),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub score: u32,
    pub shape: Shape,
    pub color: (u8, u8, u8),
    /// Epoch ms until which inputs are ignored; only ever moves forward.
    pub stun_until: u64,
    /// Commands seen inside the current rate-limit window.
    #[serde(default)]
    pub packet_count: u32,
    /// Epoch ms at which the current rate-limit window opened.
    #[serde(default)]
    pub window_start: u64,
}

impl Player {
    pub fn new(id: u32, shape: Shape) -> Self {
        let (x, y) = shape.spawn_position();
        Self {
            id,
            x,
            y,
            score: 0,
            shape,
            color: shape.color(),
            stun_until: 0,
            packet_count: 0,
            window_start: 0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, PLAYER_SIZE, PLAYER_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub kind: CoinKind,
}

impl Coin {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x as f32, self.y as f32, COIN_SIZE, COIN_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[serde(rename = "WAITING")]
    Waiting,
    #[serde(rename = "PLAYING")]
    Playing,
}

/// Immutable copy of the full game state, built once per broadcast tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: u64,
    pub players: HashMap<u32, Player>,
    pub coins: Vec<Coin>,
    pub status: GameStatus,
}
