//! Allocation sizing policies.
//!
//! # Purpose
//!
//! Storage callers that grow a backing buffer ask a [`CapacityPolicy`] how much to
//! allocate for a requested minimum length. Each policy trades memory overhead for
//! reallocation frequency. Policies are stateless and their output is fully
//! determined by the input length.
//!
//! # Formulas
//!
//! With `round_up(n) = (n / 1024 + 1) * 1024` (always the next multiple of 1024,
//! even when `n` already is one):
//!
//! | Policy | Size |
//! |--------|------|
//! | [`CapacityPolicy::Fixed`] | `n` |
//! | [`CapacityPolicy::FivePercentForGrowth`] | `min(n * 1.05, round_up(n))` |
//! | [`CapacityPolicy::Doubling`] | `max(64, min(highest_one_bit(n * 1.5) << 1, round_up(n)))` |
//! | [`CapacityPolicy::ReasonablySmall`] | `max(8, min(n * 1.2, round_up(n)))` |
//!
//! Scaled lengths are computed in `f64` and truncated toward zero. Arithmetic
//! saturates at `usize::MAX` instead of wrapping.

use std::fmt;
use std::str::FromStr;

const BLOCK: usize = 1024;

/// A named allocation sizing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CapacityPolicy {
	/// Exact sizing, no slack.
	Fixed,
	/// Five percent headroom, capped at the next 1 KiB block.
	FivePercentForGrowth,
	/// Power-of-two growth with a 64 byte floor, capped at the next 1 KiB block.
	#[default]
	Doubling,
	/// Twenty percent headroom with an 8 byte floor, capped at the next 1 KiB block.
	ReasonablySmall,
}

impl CapacityPolicy {
	pub const FIXED: Self = Self::Fixed;
	pub const FIVE_PERCENT_FOR_GROWTH: Self = Self::FivePercentForGrowth;
	pub const DEFAULT: Self = Self::Doubling;
	pub const REASONABLY_SMALL: Self = Self::ReasonablySmall;

	/// Every predefined policy, in declaration order.
	pub const ALL: [Self; 4] = [
		Self::Fixed,
		Self::FivePercentForGrowth,
		Self::Doubling,
		Self::ReasonablySmall,
	];

	/// Returns the allocation size for a buffer that must hold at least `len` bytes.
	pub fn allocation_size(self, len: usize) -> usize {
		match self {
			Self::Fixed => len,
			Self::FivePercentForGrowth => scaled(len, 1.05).min(round_up_block(len)),
			Self::Doubling => {
				let grown = highest_one_bit(scaled(len, 1.5)).saturating_mul(2);
				grown.min(round_up_block(len)).max(64)
			}
			Self::ReasonablySmall => scaled(len, 1.2).min(round_up_block(len)).max(8),
		}
	}

	/// Stable lowercase name used in configuration and on the command line.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Fixed => "fixed",
			Self::FivePercentForGrowth => "five-percent",
			Self::Doubling => "default",
			Self::ReasonablySmall => "reasonably-small",
		}
	}

	/// Looks up a policy by its [`name`](Self::name).
	pub fn by_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|policy| policy.name() == name)
	}
}

impl fmt::Display for CapacityPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(self.name())
	}
}

/// Returned when a policy name does not match any predefined policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capacity policy {name:?} (expected one of: fixed, five-percent, default, reasonably-small)")]
pub struct ParsePolicyError {
	pub name: String,
}

impl FromStr for CapacityPolicy {
	type Err = ParsePolicyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::by_name(s).ok_or_else(|| ParsePolicyError { name: s.to_string() })
	}
}

/// `(len / 1024 + 1) * 1024`, saturating.
fn round_up_block(len: usize) -> usize {
	(len / BLOCK + 1).saturating_mul(BLOCK)
}

/// `trunc(len * factor)`; float-to-int casts saturate.
fn scaled(len: usize, factor: f64) -> usize {
	(len as f64 * factor) as usize
}

/// Largest power of two not exceeding `x`, or zero for zero.
fn highest_one_bit(x: usize) -> usize {
	match x {
		0 => 0,
		_ => 1 << (usize::BITS - 1 - x.leading_zeros()),
	}
}

#[cfg(test)]
mod tests;
