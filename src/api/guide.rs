//! Pulse guiding, available on mounts and on cameras with an ST-4 port.

use num_enum::TryFromPrimitive;
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Direction of a guide pulse.
///
/// Sent over the wire as its integer value.
#[derive(
    Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize_repr, Deserialize_repr, TryFromPrimitive,
)]
#[repr(i32)]
pub enum GuideDirection {
    /// Towards increasing declination (or altitude).
    North = 0,
    /// Towards decreasing declination (or altitude).
    South = 1,
    /// Towards increasing right ascension (or azimuth).
    East = 2,
    /// Towards decreasing right ascension (or azimuth).
    West = 3,
}

#[cfg(test)]
mod tests {
    use super::GuideDirection;

    #[test]
    fn travels_as_an_integer() -> eyre::Result<()> {
        assert_eq!(serde_json::to_value(GuideDirection::East)?, 2);
        assert_eq!(GuideDirection::try_from(3)?, GuideDirection::West);
        assert!(GuideDirection::try_from(4).is_err());
        Ok(())
    }
}
