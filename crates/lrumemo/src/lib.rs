//! # lrumemo
//!
//! Fixed-capacity LRU memoization for pure single-argument functions.
//!
//! ## Architecture
//! - **Index**: a [`KeyIndex`] from key to value and access-order slot
//!   (AHash `HashMap` by default, `BTreeMap` through [`OrderedMemo`])
//! - **Access order**: slot-arena doubly-linked list, least recently used at
//!   the front, so promotion and eviction are O(1)
//! - **Shared use**: [`SharedMemo`] puts the whole cache behind one
//!   `parking_lot` mutex
//!
//! ## Example
//! ```
//! use lrumemo::LruMemo;
//!
//! let mut squares: LruMemo<u64, u64, _> = LruMemo::new(|x: &u64| x * x, 2);
//!
//! assert_eq!(squares.get(&2), 4);
//! assert_eq!(squares.get(&3), 9);
//! assert_eq!(squares.get(&2), 4); // hit, 2 is now most recent
//! assert_eq!(squares.get(&4), 16); // evicts 3
//!
//! assert!(!squares.contains(&3));
//! assert_eq!(squares.least_recently_used(), Some((&2, &4)));
//! ```

#![warn(missing_docs)]

mod cache;
mod error;
mod index;
mod lru;
mod order;
mod stats;

pub use cache::SharedMemo;
pub use error::{Error, Result};
pub use index::{HashIndex, KeyIndex, OrderedIndex};
pub use lru::{Entry, LruMemo, OrderedMemo};
pub use order::KeysByRecency;
pub use stats::{CacheStats, StatsSnapshot};
