//! Linear undo/redo over two kinds of edit.
//!
//! Every entry carries the raster snapshot taken right after its edit, so
//! undo always restores the snapshot of the new newest entry. Track entries
//! additionally mean "the newest track in the store belongs to me": undo pops
//! that track onto a side stack and redo pushes it back. The log is bounded;
//! the oldest entry is evicted first. The first entry is the baseline and is
//! never undone.
//!
//! The side stack holds exactly one track per `Track` entry on the redo
//! stack, and every operation keeps it that way.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::error::SurfaceError;
use crate::raster::RasterSurface;
use crate::track::{Track, TrackStore};

/// Which kind of edit produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Pixels only: pen, eraser, fill, clear.
    Draw,
    /// A track was added to the store (its rails are on the raster too).
    Track,
}

impl EntryKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Track => "track",
        }
    }
}

/// One recorded edit and the raster state right after it.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry<S> {
    Draw(S),
    Track(S),
}

impl<S> HistoryEntry<S> {
    fn new(kind: EntryKind, snapshot: S) -> Self {
        match kind {
            EntryKind::Draw => Self::Draw(snapshot),
            EntryKind::Track => Self::Track(snapshot),
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Draw(_) => EntryKind::Draw,
            Self::Track(_) => EntryKind::Track,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &S {
        match self {
            Self::Draw(s) | Self::Track(s) => s,
        }
    }

    fn into_draw(self) -> Self {
        match self {
            Self::Draw(s) | Self::Track(s) => Self::Draw(s),
        }
    }
}

/// Bounded undo log plus its redo stacks.
#[derive(Debug)]
pub struct History<S> {
    entries: VecDeque<HistoryEntry<S>>,
    redo: Vec<HistoryEntry<S>>,
    track_redo: Vec<Track>,
    capacity: usize,
}

impl<S> History<S> {
    /// Create an empty history holding at most `capacity` entries (at least 2).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self { entries: VecDeque::with_capacity(capacity), redo: Vec::new(), track_redo: Vec::new(), capacity }
    }

    /// Snapshot `raster` and append an entry of `kind`, discarding all redo state.
    ///
    /// # Errors
    ///
    /// Fails if the snapshot cannot be taken; the history is unchanged.
    pub fn record<R>(&mut self, kind: EntryKind, raster: &R) -> Result<(), SurfaceError>
    where
        R: RasterSurface<Snapshot = S> + ?Sized,
    {
        let snapshot = raster.snapshot()?;
        self.push(HistoryEntry::new(kind, snapshot));
        self.redo.clear();
        self.track_redo.clear();
        tracing::debug!(kind = kind.as_str(), depth = self.entries.len(), "history record");
        Ok(())
    }

    /// Step back one entry. Returns `false` when only the baseline is left.
    ///
    /// # Errors
    ///
    /// Fails if the raster rejects the restored snapshot. The stacks have
    /// already moved by then and stay consistent with each other.
    pub fn undo<R>(&mut self, raster: &mut R, store: &mut TrackStore) -> Result<bool, SurfaceError>
    where
        R: RasterSurface<Snapshot = S> + ?Sized,
    {
        if self.entries.len() < 2 {
            return Ok(false);
        }
        let Some(mut entry) = self.entries.pop_back() else {
            return Ok(false);
        };
        if entry.kind() == EntryKind::Track {
            if let Some(track) = store.remove_last() {
                self.track_redo.push(track);
            } else {
                tracing::warn!("track entry undone with an empty track store");
                entry = entry.into_draw();
            }
        }
        tracing::debug!(kind = entry.kind().as_str(), depth = self.entries.len() - 1, "history undo");
        self.redo.push(entry);

        if let Some(top) = self.entries.back() {
            raster.restore(top.snapshot())?;
        }
        Ok(true)
    }

    /// Re-apply the most recently undone entry. Returns `false` when there is none.
    ///
    /// # Errors
    ///
    /// Fails if the raster rejects the snapshot. The stacks have already moved.
    pub fn redo<R>(&mut self, raster: &mut R, store: &mut TrackStore) -> Result<bool, SurfaceError>
    where
        R: RasterSurface<Snapshot = S> + ?Sized,
    {
        let Some(mut entry) = self.redo.pop() else {
            return Ok(false);
        };
        if entry.kind() == EntryKind::Track {
            if let Some(track) = self.track_redo.pop() {
                store.restore_track(track);
            } else {
                tracing::warn!("track entry redone without a stashed track");
                entry = entry.into_draw();
            }
        }
        tracing::debug!(kind = entry.kind().as_str(), depth = self.entries.len() + 1, "history redo");
        self.push(entry);

        if let Some(top) = self.entries.back() {
            raster.restore(top.snapshot())?;
        }
        Ok(true)
    }

    /// Forget everything, including the baseline.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.redo.clear();
        self.track_redo.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.entries.len() > 1
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Entries in the undo log, baseline included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    #[must_use]
    pub fn track_redo_len(&self) -> usize {
        self.track_redo.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Kinds in the undo log, oldest first.
    pub fn kinds(&self) -> impl Iterator<Item = EntryKind> + '_ {
        self.entries.iter().map(HistoryEntry::kind)
    }

    /// Kinds on the redo stack, next-to-redo last.
    pub fn redo_kinds(&self) -> impl Iterator<Item = EntryKind> + '_ {
        self.redo.iter().map(HistoryEntry::kind)
    }

    /// The newest entry, whose snapshot matches the current raster.
    #[must_use]
    pub fn top(&self) -> Option<&HistoryEntry<S>> {
        self.entries.back()
    }

    fn push(&mut self, entry: HistoryEntry<S>) {
        while self.entries.len() >= self.capacity {
            if self.entries.pop_front().is_some() {
                tracing::debug!(capacity = self.capacity, "history evicted oldest entry");
            }
        }
        self.entries.push_back(entry);
    }
}
