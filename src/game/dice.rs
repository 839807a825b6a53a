//! Die face assignment
//!
//! Both dice share one structural shape: six values assigned 1:1 to the
//! cube's canonical face normals, differing only in value type. Room
//! faces are drawn fresh from the pool each session; duration faces are
//! fixed.

use std::fmt::Display;
use std::ops::Index;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::consts::{DURATIONS_MIN, EMPTY_FACE_LABEL, FACE_COUNT};
use crate::rooms::RoomPool;

/// Six face values in canonical face-normal order: +X, −X, +Y, −Y, +Z, −Z
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceSet<T> {
    values: [T; FACE_COUNT],
}

impl<T> FaceSet<T> {
    pub fn new(values: [T; FACE_COUNT]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[T; FACE_COUNT] {
        &self.values
    }
}

impl<T: Display> FaceSet<T> {
    /// Renderable label for one face; the label renderer is external and
    /// consumes only this
    pub fn label(&self, face: usize) -> String {
        self.values[face].to_string()
    }
}

impl<T> Index<usize> for FaceSet<T> {
    type Output = T;

    fn index(&self, face: usize) -> &T {
        &self.values[face]
    }
}

/// Draw the room die's faces for a session: a uniform 6-sample without
/// replacement when enough rooms are available, otherwise all available
/// rooms in pool order padded with the sentinel label.
pub fn select_rooms<R: Rng + ?Sized>(pool: &RoomPool, rng: &mut R) -> FaceSet<String> {
    let mut available = pool.available();
    if available.len() >= FACE_COUNT {
        available.shuffle(rng);
    } else {
        log::warn!(
            "only {} rooms available after exclusions, padding with \"{}\"",
            available.len(),
            EMPTY_FACE_LABEL
        );
    }
    FaceSet::new(std::array::from_fn(|i| {
        available
            .get(i)
            .map_or_else(|| EMPTY_FACE_LABEL.to_string(), |r| (*r).to_string())
    }))
}

/// The duration die's fixed faces, in minutes
pub fn duration_faces() -> FaceSet<u32> {
    FaceSet::new(DURATIONS_MIN)
}
