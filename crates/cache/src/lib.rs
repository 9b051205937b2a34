//! Memory-pressure-aware caches.
//!
//! [`WeakKeyedCache`] memoizes derived data keyed by a source object without keeping
//! that source alive. Keys are held through [`std::sync::Weak`]; once the last strong
//! owner of a key is dropped its entry becomes unreachable and is purged lazily.

mod error;
pub mod strategy;
pub mod weak;

pub use error::CacheError;
pub use strategy::{FnKeys, IdentityKeys, KeyStrategy, NaturalKeys};
pub use weak::{CacheConfig, WeakKeyedCache};
