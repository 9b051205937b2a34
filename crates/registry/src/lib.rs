//! Contract bindings with profile-scoped override resolution.
//!
//! # Mental Model
//!
//! 1. **Registration:** plugin loading code adds [`Binding`]s to a [`BindingRegistry`].
//!    Each binding names the contract it implements and the [`ProfileSet`] it
//!    requires (empty means any profile).
//! 2. **Lock:** the owning [`RegistryLifecycle`] flips its phase flag once. Every
//!    registry holding that lifecycle's [`PhaseToken`] becomes read-only.
//! 3. **Resolution:** readers ask for the binding of a contract under the active
//!    profiles. Exactly one valid candidate resolves; none or several resolve to
//!    nothing. Several valid candidates is an ambiguous override and is never
//!    settled by registration order.
//!
//! A container reset starts a new generation via
//! [`RegistryLifecycle::next_generation`] with fresh registries.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`BindingRegistry`] | Contract name to ordered candidate bindings. |
//! | [`RegistryLifecycle`] | One-way registration/query phase switch. |
//! | [`Resolution`] | Outcome of resolving one contract. |
//! | [`ServiceLocator`] | Injector-facing lookup with diagnostics. |
//! | [`BindingManifest`] | TOML description of bindings and profile names. |

mod binding;
mod error;
pub mod lifecycle;
pub mod locator;
pub mod manifest;
mod profile;
mod registry;
pub mod resolve;

pub use binding::Binding;
pub use error::RegistryError;
pub use lifecycle::{PhaseToken, RegistryLifecycle};
pub use locator::{LocateError, ServiceLocator};
pub use manifest::{BindingEntry, BindingManifest, ManifestError, ProfileSpec};
pub use profile::ProfileSet;
pub use registry::{BindingMap, BindingRegistry};
pub use resolve::{Ambiguity, Resolution, find_valid, is_valid};
