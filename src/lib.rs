//! Approximate matching of free-text journal names against a reference list.
//!
//! The kernel is two pieces: [`normalize`], which maps a raw name to a
//! canonical comparison key, and [`Matcher`], which looks a key up in a
//! [`ReferenceSet`] with an exact hash check first and a threshold-gated
//! fuzzy scan second.

pub mod cache;
pub mod matcher;
pub mod normalize;
pub mod reference;

pub use cache::NormalizeCache;
pub use matcher::{Match, MatchConfig, Matcher, Scorer};
pub use normalize::{normalize, normalize_opt};
pub use reference::ReferenceSet;
