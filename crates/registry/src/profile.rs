use std::fmt;

bitflags::bitflags! {
	/// Runtime profiles a binding may be restricted to.
	///
	/// The named flags cover the host's own environments. Every other bit is free
	/// for plugins and survives all set operations unchanged.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct ProfileSet: u32 {
		/// No interactive UI is available.
		const HEADLESS = 1 << 0;
		/// A user is driving the session.
		const INTERACTIVE = 1 << 1;
		/// Running under the test harness.
		const UNIT_TEST = 1 << 2;
		/// Serving remote clients.
		const SERVER = 1 << 3;

		const _ = !0;
	}
}

impl ProfileSet {
	/// Requirement that every profile set satisfies.
	pub const ANY: Self = Self::empty();

	/// Wraps a raw mask, keeping every bit.
	pub const fn from_mask(mask: u32) -> Self {
		Self::from_bits_retain(mask)
	}

	pub const fn mask(self) -> u32 {
		self.bits()
	}

	/// Whether a binding requiring `required` is valid while `self` is active.
	///
	/// True when nothing is required, or every required bit is active.
	pub const fn satisfies(self, required: Self) -> bool {
		required.is_empty() || self.contains(required)
	}

	/// Looks up a named profile by its kebab-case name (`"unit-test"`).
	pub fn named(name: &str) -> Option<Self> {
		let flag = name.to_ascii_uppercase().replace('-', "_");
		Self::from_name(&flag)
	}
}

impl fmt::Display for ProfileSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			return f.write_str("any");
		}
		bitflags::parser::to_writer(self, f)
	}
}
