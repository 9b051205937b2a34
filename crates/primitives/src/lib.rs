//! Low-level primitives shared by storage and index callers.

/// Allocation sizing policies for growable buffers.
pub mod capacity;

pub use capacity::{CapacityPolicy, ParsePolicyError};
