//! Best-score table kept for the lifetime of the server process.

use std::collections::BTreeMap;

use duelwire_protocol::{LeaderboardUpdate, MAX_SHORT_LEN};

/// Player name → best score seen.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    scores: BTreeMap<String, u8>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `score` for `name` if it is at least the stored value.
    ///
    /// A missing entry counts as lower than any score. Equal scores
    /// overwrite. Returns `true` when the table was updated.
    pub fn submit(&mut self, name: &str, score: u8) -> bool {
        match self.scores.get_mut(name) {
            Some(best) if score < *best => false,
            Some(best) => {
                *best = score;
                true
            }
            None => {
                self.scores.insert(name.to_string(), score);
                true
            }
        }
    }

    pub fn best(&self, name: &str) -> Option<u8> {
        self.scores.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.scores.iter().map(|(name, &score)| (name.as_str(), score))
    }

    /// Builds the broadcast message for the current table.
    ///
    /// The wire count is one byte, so once more than 255 names are known
    /// only the 255 highest scores are sent.
    pub fn to_update(&self) -> LeaderboardUpdate {
        if self.scores.len() <= MAX_SHORT_LEN {
            return LeaderboardUpdate::new(self.scores.clone());
        }
        let mut ranked: Vec<(&String, &u8)> = self.scores.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1));
        let entries = ranked
            .into_iter()
            .take(MAX_SHORT_LEN)
            .map(|(name, &score)| (name.clone(), score))
            .collect();
        LeaderboardUpdate::new(entries)
    }
}
