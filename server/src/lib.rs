//! # Arena Game Server Library
//!
//! This library provides the authoritative server for the two-player coin
//! arena. It owns the canonical game state, applies validated client
//! inputs, and broadcasts full state snapshots so clients can reconstruct
//! smooth motion on their side of a deliberately laggy link.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Simulation
//! The server holds the only trusted copy of the game: player positions
//! and scores, the coin population, and the live-connection registry.
//! Clients send input commands and receive snapshots; they never mutate
//! shared state directly.
//!
//! ### Input Validation
//! Every command passes an anti-cheat policy before it can move a player:
//! unknown senders are ignored, stunned players are frozen, and a rolling
//! per-player rate limit caps command throughput. Rejections are silent
//! so a misbehaving client learns nothing from probing.
//!
//! ### Collision and Pickup Rules
//! Movement is resolved against every other player's bounding box; a
//! blocked move bounces the mover backwards and stuns it briefly. Coins
//! spawn on a timer up to a fixed cap and are awarded to the first player
//! whose box covers them, lowest player id winning ties.
//!
//! ### State Broadcasting
//! A fixed-cadence loop builds one snapshot per tick under the state lock
//! and fans the serialized bytes out to every connection outside it, so a
//! slow or dead peer never stalls the simulation or the other player.
//!
//! ## Module Organization
//!
//! - [`game`]: the simulation itself, covering players, coins, the input
//!   policy, collision resolution, and snapshot construction.
//! - [`registry`]: the live-connection registry holding each client's
//!   delayed-send handle.
//! - [`network`]: the TCP listener, per-connection reader tasks, and the
//!   broadcast/simulation loop.
//!
//! ## Concurrency Model
//!
//! One task per connection reads inbound frames, one task per connection
//! dispatches its artificially delayed outbound queue, and a single loop
//! drives simulation and broadcast. All shared state sits behind one
//! coarse lock (deliberate at a hard cap of two players), and the lock
//! is never held across network I/O.

pub mod game;
pub mod network;
pub mod registry;
