//! Client-side copy of the leaderboard.

use std::collections::BTreeMap;

use duelwire_protocol::{Message, ScoreSubmit};

use crate::{ClientError, MessageSink};

/// Receives the sorted leaderboard whenever it changes.
pub trait LeaderboardSink {
    fn render(&mut self, entries: &[(String, u8)]);
}

/// Merges leaderboard updates and keeps them sorted for display.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardView {
    scores: BTreeMap<String, u8>,
    entries: Vec<(String, u8)>,
}

impl LeaderboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a `LeaderboardUpdate` and renders the result.
    ///
    /// Each received entry overwrites the local one. Names missing from
    /// the update are kept. Other kinds are ignored.
    pub fn on_message(&mut self, msg: &Message, sink: &mut dyn LeaderboardSink) {
        let Message::LeaderboardUpdate(update) = msg else {
            return;
        };
        for (name, &score) in &update.entries {
            self.scores.insert(name.clone(), score);
        }

        self.entries = self
            .scores
            .iter()
            .map(|(name, &score)| (name.clone(), score))
            .collect();
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        sink.render(&self.entries);
    }

    /// Current display list, highest score first.
    pub fn entries(&self) -> &[(String, u8)] {
        &self.entries
    }

    /// Sends a finished score, saturating at 255.
    pub fn submit_score(
        &self,
        name: &str,
        score: u32,
        sink: &dyn MessageSink,
    ) -> Result<(), ClientError> {
        let score = u8::try_from(score).unwrap_or(u8::MAX);
        sink.send(ScoreSubmit::new(name, score).into())
    }
}
