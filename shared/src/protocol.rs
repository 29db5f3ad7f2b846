//! Wire protocol: newline-delimited JSON frames with a closed tagged union

use crate::Snapshot;
use serde::{Deserialize, Serialize};

/// Upper bound on a single encoded frame; larger frames are treated as
/// malformed and dropped.
pub const MAX_FRAME_BYTES: usize = 4096;

/// Every message that can cross the wire, tagged by the `t` field.
/// Unknown tags fail to decode and the frame is discarded by the receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Message {
    /// Server greets a new connection with its assigned player id.
    #[serde(rename = "con")]
    Connect { id: u32 },
    /// Client requests a single input command.
    #[serde(rename = "inp")]
    Input { d: Command },
    /// Server broadcasts a full state snapshot.
    #[serde(rename = "st")]
    State { d: Snapshot },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    #[serde(rename = "u")]
    Up,
    #[serde(rename = "d")]
    Down,
    #[serde(rename = "l")]
    Left,
    #[serde(rename = "r")]
    Right,
    #[serde(rename = "rst")]
    Reset,
    #[serde(rename = "dash")]
    Dash,
}

/// Encodes a message as one newline-terminated frame.
pub fn encode(message: &Message) -> Result<Vec<u8>, serde_json::Error> {
    let mut frame = serde_json::to_vec(message)?;
    frame.push(b'\n');
    Ok(frame)
}

/// Decodes one frame (without its trailing newline). Returns `None` for
/// malformed or oversized input; the caller drops the frame silently.
pub fn decode(frame: &str) -> Option<Message> {
    if frame.len() > MAX_FRAME_BYTES {
        return None;
    }
    serde_json::from_str(frame).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameStatus, Player, Shape};
    use std::collections::HashMap;

    #[test]
    fn test_connect_wire_format() {
        let frame = encode(&Message::Connect { id: 3 }).unwrap();
        let text = String::from_utf8(frame).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.trim_end(), r#"{"t":"con","id":3}"#);
    }

    #[test]
    fn test_input_wire_format() {
        let frame = encode(&Message::Input { d: Command::Up }).unwrap();
        let text = String::from_utf8(frame).unwrap();
        assert_eq!(text.trim_end(), r#"{"t":"inp","d":"u"}"#);
    }

    #[test]
    fn test_command_tokens() {
        let tokens = [
            (Command::Up, "\"u\""),
            (Command::Down, "\"d\""),
            (Command::Left, "\"l\""),
            (Command::Right, "\"r\""),
            (Command::Reset, "\"rst\""),
            (Command::Dash, "\"dash\""),
        ];

        for (command, expected) in tokens {
            assert_eq!(serde_json::to_string(&command).unwrap(), expected);
        }
    }

    #[test]
    fn test_state_roundtrip() {
        let mut players = HashMap::new();
        players.insert(1, Player::new(1, Shape::Square));

        let message = Message::State {
            d: Snapshot {
                time: 42,
                players,
                coins: Vec::new(),
                status: GameStatus::Waiting,
            },
        };

        let frame = encode(&message).unwrap();
        let text = String::from_utf8(frame).unwrap();
        match decode(text.trim_end()) {
            Some(Message::State { d }) => {
                assert_eq!(d.time, 42);
                assert_eq!(d.players.len(), 1);
                assert_eq!(d.status, GameStatus::Waiting);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode("not json at all").is_none());
        assert!(decode(r#"{"t":"unknown"}"#).is_none());
        assert!(decode(r#"{"t":"inp","d":"teleport"}"#).is_none());
        assert!(decode("").is_none());
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let padding = "x".repeat(MAX_FRAME_BYTES + 1);
        assert!(decode(&padding).is_none());
    }
}
