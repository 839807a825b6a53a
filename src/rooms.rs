//! Candidate room pool with per-room exclusion
//!
//! The pool is the single source of truth for which rooms can land on the
//! dice. Mutations enforce the minimum-pool invariant: at least
//! [`MIN_ROOMS`](crate::consts::MIN_ROOMS) rooms must stay available
//! (present and not excluded) at all times.

use std::collections::HashSet;

use thiserror::Error;

use crate::consts::MIN_ROOMS;

/// Canonical room list used when no URL state is present
pub const DEFAULT_ROOMS: [&str; 13] = [
    "Kitchen",
    "Butlers Pantry",
    "Family Room",
    "Downstairs bathroom",
    "Garage",
    "Downstairs bedroom",
    "Ella's Room",
    "Aurora's Room",
    "Upstairs landing",
    "Main bedroom",
    "Walk in Robe",
    "Main bathroom",
    "Kids bathroom",
];

/// Rejected pool mutations; all are non-fatal and leave the pool unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room name cannot be empty")]
    EmptyName,
    #[error("room \"{0}\" already exists")]
    Duplicate(String),
    #[error("no room named \"{0}\"")]
    Unknown(String),
    #[error("at least {MIN_ROOMS} rooms must stay available")]
    MinimumPool,
}

/// Ordered room list plus the subset the user has excluded from rolls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPool {
    rooms: Vec<String>,
    excluded: HashSet<String>,
}

impl Default for RoomPool {
    fn default() -> Self {
        Self {
            rooms: DEFAULT_ROOMS.iter().map(|r| (*r).to_string()).collect(),
            excluded: HashSet::new(),
        }
    }
}

impl RoomPool {
    /// Pool with the canonical default rooms and no exclusions
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool restored from decoded URL state. Exclusions that name rooms
    /// not present in the list are dropped.
    pub fn from_parts(rooms: Vec<String>, excluded: HashSet<String>) -> Self {
        let excluded = excluded
            .into_iter()
            .filter(|e| rooms.iter().any(|r| r == e))
            .collect();
        Self { rooms, excluded }
    }

    /// Rooms in insertion order
    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }

    /// Rooms currently eligible for dice selection, in insertion order
    pub fn available(&self) -> Vec<&str> {
        self.rooms
            .iter()
            .filter(|r| !self.excluded.contains(r.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.rooms.len() - self.excluded.len()
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn is_excluded(&self, label: &str) -> bool {
        self.excluded.contains(label)
    }

    /// Whether the delete control should be enabled at all
    pub fn can_delete(&self) -> bool {
        self.rooms.len() > MIN_ROOMS
    }

    /// True when the pool matches the canonical default list
    /// (order-independent) with zero exclusions
    pub fn is_default(&self) -> bool {
        if !self.excluded.is_empty() || self.rooms.len() != DEFAULT_ROOMS.len() {
            return false;
        }
        let mut sorted: Vec<&str> = self.rooms.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let mut default_sorted = DEFAULT_ROOMS;
        default_sorted.sort_unstable();
        sorted == default_sorted
    }

    /// Append a room. Rejects empty/whitespace names and case-insensitive
    /// duplicates.
    pub fn add(&mut self, label: &str) -> Result<(), RoomError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(RoomError::EmptyName);
        }
        if self
            .rooms
            .iter()
            .any(|r| r.eq_ignore_ascii_case(label))
        {
            return Err(RoomError::Duplicate(label.to_string()));
        }
        self.rooms.push(label.to_string());
        Ok(())
    }

    /// Remove a room from the pool (and from the excluded set if present).
    /// Rejected when the list is already at the floor, or when removing an
    /// available room would drop the available count below the floor.
    pub fn delete(&mut self, label: &str) -> Result<(), RoomError> {
        if self.rooms.len() <= MIN_ROOMS {
            return Err(RoomError::MinimumPool);
        }
        let index = self
            .rooms
            .iter()
            .position(|r| r == label)
            .ok_or_else(|| RoomError::Unknown(label.to_string()))?;
        if !self.excluded.contains(label) && self.available_count() - 1 < MIN_ROOMS {
            return Err(RoomError::MinimumPool);
        }
        self.rooms.remove(index);
        self.excluded.remove(label);
        Ok(())
    }

    /// Flip a room's exclusion state. Un-excluding always succeeds;
    /// excluding is rejected once the available count is at the floor.
    /// Returns the new exclusion state.
    pub fn toggle_exclude(&mut self, label: &str) -> Result<bool, RoomError> {
        if !self.rooms.iter().any(|r| r == label) {
            return Err(RoomError::Unknown(label.to_string()));
        }
        if self.excluded.remove(label) {
            return Ok(false);
        }
        if self.available_count() <= MIN_ROOMS {
            return Err(RoomError::MinimumPool);
        }
        self.excluded.insert(label.to_string());
        Ok(true)
    }

    /// Restore the canonical default list and clear all exclusions
    pub fn reset_to_default(&mut self) {
        *self = Self::default();
    }
}
