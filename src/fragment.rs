//! URL-fragment codec for shareable room-pool state
//!
//! Wire format: `#r=<entries>` where each entry is
//! `<percent-encoded-label>:<1|0>` (1 = included, 0 = excluded) and
//! entries are joined by `|`. The default pool encodes to the empty
//! string: default state is represented by the *absence* of encoded data,
//! and decoding an absent/too-small fragment fails so the caller falls
//! back to defaults.

use std::collections::HashSet;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use thiserror::Error;

use crate::consts::MIN_ROOMS;
use crate::rooms::RoomPool;

/// Query key carrying the room entries inside the fragment
const ROOMS_KEY: &str = "r";

/// Availability marker for an excluded room
const EXCLUDED_MARK: &str = "0";

/// Escape everything outside the RFC 3986 unreserved set, so `:`, `|`,
/// `&`, `=` and `#` in labels can never collide with the framing.
const LABEL_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Decode failures; all recovered by falling back to the default pool
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("fragment is empty")]
    Empty,
    #[error("fragment has no \"{ROOMS_KEY}\" parameter")]
    MissingKey,
    #[error("fragment decodes to {0} rooms, need at least {MIN_ROOMS}")]
    TooFewRooms(usize),
}

/// Encode pool state as a URL fragment, or the empty string for the
/// default pool.
pub fn encode(pool: &RoomPool) -> String {
    if pool.is_default() {
        return String::new();
    }
    let entries: Vec<String> = pool
        .rooms()
        .iter()
        .map(|room| {
            let mark = if pool.is_excluded(room) { 0 } else { 1 };
            format!("{}:{}", utf8_percent_encode(room, LABEL_ESCAPE), mark)
        })
        .collect();
    format!("#{ROOMS_KEY}={}", entries.join("|"))
}

/// Decode a URL fragment (with or without the leading `#`) into a pool.
///
/// Parsing is tolerant: entries with no label are skipped, and any
/// availability marker other than `0` (including none) means included.
/// Fewer than [`MIN_ROOMS`] decoded rooms is rejected outright, since
/// untrusted input must not smuggle in a too-small pool.
pub fn decode(fragment: &str) -> Result<RoomPool, DecodeError> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    if fragment.is_empty() {
        return Err(DecodeError::Empty);
    }

    let entries = fragment
        .split('&')
        .find_map(|pair| pair.strip_prefix(ROOMS_KEY).and_then(|p| p.strip_prefix('=')))
        .ok_or(DecodeError::MissingKey)?;

    let mut rooms = Vec::new();
    let mut excluded = HashSet::new();
    for entry in entries.split('|') {
        let (label, mark) = match entry.split_once(':') {
            Some((label, mark)) => (label, Some(mark)),
            None => (entry, None),
        };
        if label.is_empty() {
            continue;
        }
        let label = percent_decode_str(label).decode_utf8_lossy().into_owned();
        if mark == Some(EXCLUDED_MARK) {
            excluded.insert(label.clone());
        }
        rooms.push(label);
    }

    if rooms.len() < MIN_ROOMS {
        return Err(DecodeError::TooFewRooms(rooms.len()));
    }
    Ok(RoomPool::from_parts(rooms, excluded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool_of(rooms: &[&str], excluded: &[&str]) -> RoomPool {
        RoomPool::from_parts(
            rooms.iter().map(|r| (*r).to_string()).collect(),
            excluded.iter().map(|r| (*r).to_string()).collect(),
        )
    }

    #[test]
    fn test_default_pool_encodes_empty() {
        assert_eq!(encode(&RoomPool::new()), "");
    }

    #[test]
    fn test_decode_empty_and_bare_hash_fail() {
        assert_eq!(decode(""), Err(DecodeError::Empty));
        assert_eq!(decode("#"), Err(DecodeError::Empty));
    }

    #[test]
    fn test_decode_missing_key_fails() {
        assert_eq!(decode("#x=a:1|b:1"), Err(DecodeError::MissingKey));
        assert_eq!(decode("#rooms=a:1"), Err(DecodeError::MissingKey));
    }

    #[test]
    fn test_decode_too_few_rooms_fails() {
        assert_eq!(
            decode("#r=a:1|b:1|c:1"),
            Err(DecodeError::TooFewRooms(3))
        );
    }

    #[test]
    fn test_round_trip_with_exclusions() {
        let pool = pool_of(
            &["Kitchen", "Garage", "Attic", "Shed", "Porch", "Loft", "Den"],
            &["Garage", "Den"],
        );
        let encoded = encode(&pool);
        assert!(encoded.starts_with("#r="));
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, pool);
    }

    #[test]
    fn test_labels_with_framing_characters_round_trip() {
        let pool = pool_of(
            &["a:b", "c|d", "e&f=g", "100%", "x#y", "spa ce"],
            &["c|d"],
        );
        let decoded = decode(&encode(&pool)).unwrap();
        assert_eq!(decoded, pool);
    }

    #[test]
    fn test_decode_skips_malformed_entries() {
        let pool = decode("#r=a:1|:0|b:1|c:1|d:1|e:1|f:0").unwrap();
        assert_eq!(pool.len(), 6);
        assert!(pool.is_excluded("f"));
    }

    #[test]
    fn test_decode_availability_defaults_to_included() {
        // No marker, or any marker other than "0", means included.
        let pool = decode("#r=a|b:1|c:yes|d:00|e:1|f:1").unwrap();
        assert_eq!(pool.available_count(), 6);
    }

    #[test]
    fn test_decode_tolerates_extra_params() {
        let pool = decode("#v=2&r=a:1|b:1|c:1|d:1|e:1|f:1").unwrap();
        assert_eq!(pool.len(), 6);
    }

    #[test]
    fn test_exclusion_state_survives_full_cycle() {
        // Default pool, exclude 7 of 13, encode, decode: same 13 rooms
        // with the same 7 excluded.
        let mut pool = RoomPool::new();
        let names: Vec<String> = pool.rooms()[..7].to_vec();
        for name in &names {
            pool.toggle_exclude(name).unwrap();
        }
        let decoded = decode(&encode(&pool)).unwrap();
        assert_eq!(decoded.len(), 13);
        assert_eq!(decoded.excluded_count(), 7);
        for name in &names {
            assert!(decoded.is_excluded(name));
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            labels in proptest::collection::vec("[a-zA-Z0-9 :|&=#%']{1,20}", 6..14),
            flags in proptest::collection::vec(any::<bool>(), 14),
        ) {
            let excluded: HashSet<String> = labels
                .iter()
                .zip(&flags)
                .filter(|(_, keep)| **keep)
                .map(|(l, _)| l.clone())
                .collect();
            let pool = RoomPool::from_parts(labels, excluded);
            prop_assume!(!pool.is_default());
            let decoded = decode(&encode(&pool)).unwrap();
            prop_assert_eq!(decoded, pool);
        }
    }
}
