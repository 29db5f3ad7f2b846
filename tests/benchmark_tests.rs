//! Performance benchmarks for critical game systems

use client::game::SnapshotBuffer;
use server::game::GameState;
use shared::protocol::{self, Command, Message};
use shared::{Aabb, GameStatus, PLAYER_SIZE};
use std::time::Instant;

/// Benchmarks the box-overlap test at the heart of every collision check
#[test]
fn benchmark_intersection() {
    let a = Aabb::new(100.0, 100.0, PLAYER_SIZE, PLAYER_SIZE);
    let b = Aabb::new(110.0, 110.0, PLAYER_SIZE, PLAYER_SIZE);

    let iterations = 100_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = a.intersects(&b);
    }

    let duration = start.elapsed();
    println!(
        "Intersection: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 100ms for 100k iterations
    assert!(duration.as_millis() < 100);
}

/// Benchmarks the full input policy path including collision checks
#[test]
fn benchmark_apply_command() {
    let mut game = GameState::new(0);
    let mover = game.add_player();
    let _other = game.add_player();

    let iterations = 10_000;
    let start = Instant::now();

    let mut now = 10_000u64;
    for i in 0..iterations {
        // Keep the rate limiter from swallowing the benchmark.
        if i % 50 == 0 {
            now += 1_000;
        }
        let command = if i % 2 == 0 {
            Command::Right
        } else {
            Command::Left
        };
        game.apply_command(mover, command, now);
    }

    let duration = start.elapsed();
    println!(
        "Apply command: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks interpolation over a full snapshot buffer
#[test]
fn benchmark_interpolation() {
    let mut game = GameState::new(0);
    game.add_player();
    game.add_player();

    let mut buffer = SnapshotBuffer::new();
    for i in 0..20u64 {
        let mut snapshot = game.snapshot(GameStatus::Playing);
        snapshot.time = 10_000 + i * 16;
        buffer.push(snapshot);
    }

    let iterations = 10_000;
    let start = Instant::now();

    for i in 0..iterations {
        let now = 10_400 + (i % 300) as u64;
        let _ = buffer.current_state(now);
    }

    let duration = start.elapsed();
    println!(
        "Interpolation: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks snapshot encoding, the per-tick serialization cost
#[test]
fn benchmark_snapshot_encoding() {
    let mut game = GameState::new(0);
    game.add_player();
    game.add_player();

    let snapshot = game.snapshot(GameStatus::Playing);

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let message = Message::State {
            d: snapshot.clone(),
        };
        let _ = protocol::encode(&message);
    }

    let duration = start.elapsed();
    println!(
        "Snapshot encoding: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 2000);
}
