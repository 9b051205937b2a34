/// Errors raised at the cache call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
	/// The key offered for insertion has no strong owner left.
	#[error("cannot insert a reclaimed key")]
	ReclaimedKey,
}
