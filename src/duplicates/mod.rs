//! Duplicate aggregation.
//!
//! This module provides functionality for:
//! - Keying catalog entries by name, or by name and size
//! - Keeping only keys present in two or more directories
//! - Deriving per-directory dupe counts and the directory pair matrix

pub mod aggregator;
pub mod groups;

pub use aggregator::{aggregate, Aggregation, AggregationStats};
pub use groups::{DuplicateGroup, DuplicateKey, GroupMember, MatchMode};
