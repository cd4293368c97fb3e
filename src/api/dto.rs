//! Request bodies and query strings, validated before they reach the progress logic.

use serde::Deserialize;

use crate::logic::LeaderboardLimit;
use crate::models::{ExternalId, ProgressDelta, ProgressError};

/// Longest display name accepted, in characters.
pub const MAX_DISPLAY_NAME_CHARS: usize = 255;

/// Body of `POST /players/me`. Older clients send `telegram_id` / `username`.
#[derive(Clone, Debug, Deserialize)]
pub struct PlayerMeBody {
    #[serde(alias = "telegram_id")]
    pub external_id: ExternalId,
    #[serde(default, alias = "username")]
    pub display_name: Option<String>,
}

impl PlayerMeBody {
    pub fn validate(self) -> Result<Self, ProgressError> {
        if let Some(name) = &self.display_name {
            let chars = name.chars().count();
            if chars > MAX_DISPLAY_NAME_CHARS {
                return Err(ProgressError::Validation(format!(
                    "display_name must be at most {} characters (got {})",
                    MAX_DISPLAY_NAME_CHARS, chars
                )));
            }
        }
        Ok(self)
    }
}

/// Body of `POST /progress/update`. Omitted deltas are zero.
#[derive(Clone, Debug, Deserialize)]
pub struct ProgressBody {
    #[serde(alias = "telegram_id")]
    pub external_id: ExternalId,
    #[serde(default)]
    pub delta_coins: i64,
    #[serde(default)]
    pub delta_diamonds: i64,
    #[serde(default)]
    pub delta_xp: i64,
    #[serde(default)]
    pub add_taps: i64,
}

impl ProgressBody {
    pub fn delta(&self) -> ProgressDelta {
        ProgressDelta {
            coins: self.delta_coins,
            diamonds: self.delta_diamonds,
            xp: self.delta_xp,
            taps: self.add_taps,
        }
    }
}

/// Query of `GET /leaderboard/weekly`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

impl LeaderboardQuery {
    pub fn limit(&self) -> Result<LeaderboardLimit, ProgressError> {
        match self.limit {
            Some(n) => LeaderboardLimit::new(n),
            None => Ok(LeaderboardLimit::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn me_body_accepts_legacy_field_names() {
        let body: PlayerMeBody =
            serde_json::from_str(r#"{"telegram_id": 42, "username": "alice"}"#).unwrap();
        assert_eq!(body.external_id, 42);
        assert_eq!(body.display_name.as_deref(), Some("alice"));
    }

    #[test]
    fn me_body_rejects_overlong_name() {
        let body = PlayerMeBody {
            external_id: 1,
            display_name: Some("é".repeat(MAX_DISPLAY_NAME_CHARS + 1)),
        };
        assert!(matches!(body.validate(), Err(ProgressError::Validation(_))));

        let ok = PlayerMeBody {
            external_id: 1,
            display_name: Some("é".repeat(MAX_DISPLAY_NAME_CHARS)),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn progress_body_defaults_missing_deltas_to_zero() {
        let body: ProgressBody = serde_json::from_str(r#"{"external_id": 5, "add_taps": 3}"#).unwrap();
        assert_eq!(
            body.delta(),
            ProgressDelta {
                coins: 0,
                diamonds: 0,
                xp: 0,
                taps: 3
            }
        );
    }

    #[test]
    fn leaderboard_limit_bounds() {
        assert_eq!(LeaderboardQuery { limit: None }.limit().unwrap().get(), 10);
        assert_eq!(LeaderboardQuery { limit: Some(1) }.limit().unwrap().get(), 1);
        assert_eq!(LeaderboardQuery { limit: Some(100) }.limit().unwrap().get(), 100);
        assert!(LeaderboardQuery { limit: Some(0) }.limit().is_err());
        assert!(LeaderboardQuery { limit: Some(101) }.limit().is_err());
        assert!(LeaderboardQuery { limit: Some(-3) }.limit().is_err());
    }
}
