//! Content author credentials.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const STEAM_ID_DIGITS: usize = 17;

/// The person a build is attributed to.
///
/// The platform ids end up only in container headers, never in the
/// human-readable sidecar metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub steam_id: u64,
    pub discord_id: u64,
}

impl Author {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyAuthorName);
        }

        if self.steam_id == 0 || self.steam_id.to_string().len() != STEAM_ID_DIGITS {
            return Err(ValidationError::InvalidSteamId(self.steam_id));
        }

        if self.discord_id == 0 {
            return Err(ValidationError::InvalidDiscordId);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Author {
        Author {
            name: "trbflxr".into(),
            steam_id: 76_561_198_000_000_001,
            discord_id: 42,
        }
    }

    #[test]
    fn valid_author() {
        assert!(author().validate().is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        let a = Author {
            name: "   ".into(),
            ..author()
        };
        assert!(matches!(a.validate(), Err(ValidationError::EmptyAuthorName)));
    }

    #[test]
    fn steam_id_must_have_17_digits() {
        for steam_id in [0, 1_234_567_890_123_456, 123_456_789_012_345_678] {
            let a = Author { steam_id, ..author() };
            assert!(matches!(a.validate(), Err(ValidationError::InvalidSteamId(id)) if id == steam_id));
        }
        let a = Author {
            steam_id: 12_345_678_901_234_567,
            ..author()
        };
        assert!(a.validate().is_ok());
    }

    #[test]
    fn discord_id_must_be_nonzero() {
        let a = Author {
            discord_id: 0,
            ..author()
        };
        assert!(matches!(a.validate(), Err(ValidationError::InvalidDiscordId)));
    }
}
