//! # Arena Game Client Library
//!
//! Client-side state reconstruction for the two-player coin arena. The
//! server is authoritative and its snapshots arrive late by design, since
//! both directions of the link carry an artificial delay, so this crate's
//! job is to turn a discretely-timed, delayed snapshot stream back into
//! smooth continuous motion.
//!
//! ## Architecture Overview
//!
//! ### Snapshot Buffering
//! Every state snapshot the server broadcasts is appended to a bounded
//! history keyed by its server timestamp. The buffer holds the most
//! recent twenty snapshots and evicts the oldest on overflow.
//!
//! ### Interpolated Rendering
//! Instead of drawing the newest data as it arrives, the render path asks
//! for the state as of a fixed interval in the past. That interval is
//! chosen to exceed the one-hop transport delay, so the buffer almost
//! always holds snapshots on both sides of the requested instant and can
//! blend positions linearly between them. Discrete attributes such as
//! scores, shapes, colors, and the coin list are never blended; they snap
//! to the later snapshot's values.
//!
//! ### Outbound Input
//! Input commands are small tokens sent through the same artificial-latency
//! shim the server uses, making each hop of the round trip pay the delay
//! once.
//!
//! ## Module Organization
//!
//! - [`game`]: the bounded snapshot buffer and the interpolation that
//!   reconstructs render state from it.
//! - [`network`]: the connection, covering greeting handling, the
//!   background reader task, and the delayed send path.
//!
//! Rendering itself is out of scope: an external render loop consumes
//! [`network::Client::current_state`] and produces input commands.

pub mod game;
pub mod network;
