use serde::{Deserialize, Serialize};

/// Parameter passing mode for a binder method argument.
///
/// Encoded on the wire (JSON) as the plain integer `0 | 1 | 2`, matching the
/// external schema in the system's JSON catalog rather than a named variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Default for Direction {
    /// AIDL parameters with no explicit modifier default to `in`.
    fn default() -> Self {
        Direction::In
    }
}

impl From<Direction> for u8 {
    fn from(value: Direction) -> Self {
        match value {
            Direction::In => 0,
            Direction::Out => 1,
            Direction::InOut => 2,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::In),
            1 => Ok(Direction::Out),
            2 => Ok(Direction::InOut),
            other => Err(format!("invalid direction code {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        for dir in [Direction::In, Direction::Out, Direction::InOut] {
            let json = serde_json::to_string(&dir).unwrap();
            let back: Direction = serde_json::from_str(&json).unwrap();
            assert_eq!(dir, back);
        }
    }

    #[test]
    fn in_is_the_default() {
        assert_eq!(Direction::default(), Direction::In);
    }

    #[test]
    fn serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&Direction::Out).unwrap(), "1");
    }
}
