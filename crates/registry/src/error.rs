/// Fatal registry configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// A binding was offered after the registration window closed.
	#[error("cannot bind {contract:?}: registry generation {generation} is locked")]
	Locked { contract: String, generation: u64 },
}
