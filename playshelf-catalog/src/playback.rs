//! Single-record playback session and the recently-opened list.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::{LOG_TARGET, RECENT_LIMIT};
use crate::record::GameRecord;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Closed,
    Open {
        record: GameRecord,
        embedded: bool,
    },
}

/// At most one open record. Closing always releases embedded content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackSession {
    state: PlaybackState,
}

impl PlaybackSession {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PlaybackState::Closed,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Open `record`, replacing whatever was open. The new record starts
    /// un-embedded even if the previous one was mounted.
    pub fn open(&mut self, record: GameRecord) {
        if !record.is_playable() {
            log::debug!(target: LOG_TARGET, "opening '{}' without a play url", record.title);
        }
        self.state = PlaybackState::Open {
            record,
            embedded: false,
        };
    }

    /// Mount the open record's content. Returns the url to embed, or `None`
    /// when nothing is open or the record has no url.
    pub fn embed(&mut self) -> Option<&str> {
        match &mut self.state {
            PlaybackState::Open { record, embedded } if record.is_playable() => {
                *embedded = true;
                Some(record.play_url.as_str())
            }
            _ => None,
        }
    }

    /// Return to `Closed`, dropping any mounted content. Reports whether
    /// content was mounted at the time.
    pub fn close(&mut self) -> bool {
        let was_embedded = self.is_embedded();
        self.state = PlaybackState::Closed;
        was_embedded
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, PlaybackState::Open { .. })
    }

    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        matches!(self.state, PlaybackState::Open { embedded: true, .. })
    }

    #[must_use]
    pub const fn active(&self) -> Option<&GameRecord> {
        match &self.state {
            PlaybackState::Closed => None,
            PlaybackState::Open { record, .. } => Some(record),
        }
    }

    /// Whether the open record can actually be embedded; renderers use this
    /// to show a broken-link affordance.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.active().is_some_and(GameRecord::is_playable)
    }
}

/// Most-recent-first record ids, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentlyOpened {
    ids: VecDeque<usize>,
    limit: usize,
}

impl Default for RecentlyOpened {
    fn default() -> Self {
        Self::with_limit(RECENT_LIMIT)
    }
}

impl RecentlyOpened {
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            ids: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn record(&mut self, id: usize) {
        self.ids.retain(|existing| *existing != id);
        self.ids.push_front(id);
        self.ids.truncate(self.limit);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.ids.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
