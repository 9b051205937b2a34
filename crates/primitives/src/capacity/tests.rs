use proptest::prelude::*;
use rstest::rstest;

use super::*;

#[rstest]
#[case(0, 0, 0, 64, 8)]
#[case(1, 1, 1, 64, 8)]
#[case(63, 63, 66, 128, 75)]
#[case(64, 64, 67, 128, 76)]
#[case(65, 65, 68, 128, 78)]
#[case(100, 100, 105, 256, 120)]
#[case(1023, 1023, 1024, 1024, 1024)]
#[case(1024, 1024, 1075, 2048, 1228)]
#[case(1025, 1025, 1076, 2048, 1230)]
#[case(100_000, 100_000, 100_352, 100_352, 100_352)]
fn golden_sizes(
	#[case] len: usize,
	#[case] fixed: usize,
	#[case] five_percent: usize,
	#[case] doubling: usize,
	#[case] small: usize,
) {
	assert_eq!(CapacityPolicy::FIXED.allocation_size(len), fixed);
	assert_eq!(CapacityPolicy::FIVE_PERCENT_FOR_GROWTH.allocation_size(len), five_percent);
	assert_eq!(CapacityPolicy::DEFAULT.allocation_size(len), doubling);
	assert_eq!(CapacityPolicy::REASONABLY_SMALL.allocation_size(len), small);
}

#[test]
fn round_up_always_moves_to_next_block() {
	assert_eq!(round_up_block(0), 1024);
	assert_eq!(round_up_block(1023), 1024);
	assert_eq!(round_up_block(1024), 2048);
	assert_eq!(round_up_block(usize::MAX), usize::MAX);
}

#[test]
fn highest_one_bit_matches_power_of_two_floor() {
	assert_eq!(highest_one_bit(0), 0);
	assert_eq!(highest_one_bit(1), 1);
	assert_eq!(highest_one_bit(150), 128);
	assert_eq!(highest_one_bit(256), 256);
	assert_eq!(highest_one_bit(usize::MAX), 1 << (usize::BITS - 1));
}

#[test]
fn huge_lengths_saturate() {
	for policy in CapacityPolicy::ALL {
		let size = policy.allocation_size(usize::MAX);
		assert!(size >= usize::MAX - BLOCK, "{policy} shrank a huge request to {size}");
	}
}

#[test]
fn names_round_trip_through_from_str() {
	for policy in CapacityPolicy::ALL {
		assert_eq!(policy.name().parse::<CapacityPolicy>(), Ok(policy));
		assert_eq!(policy.to_string(), policy.name());
	}
	let err = "triple".parse::<CapacityPolicy>().unwrap_err();
	assert_eq!(err.name, "triple");
}

#[test]
fn default_policy_is_doubling() {
	assert_eq!(CapacityPolicy::default(), CapacityPolicy::DEFAULT);
}

proptest! {
	/// No policy ever returns less than the requested length.
	#[test]
	fn prop_never_below_request(len in 0usize..10_000_000) {
		for policy in CapacityPolicy::ALL {
			prop_assert!(policy.allocation_size(len) >= len, "{} under-allocated {}", policy, len);
		}
	}

	/// Slack is bounded by the next 1 KiB block (or the policy's small-size floor).
	#[test]
	fn prop_slack_bounded_by_block(len in 0usize..10_000_000) {
		let cap = round_up_block(len);
		prop_assert!(CapacityPolicy::FIVE_PERCENT_FOR_GROWTH.allocation_size(len) <= cap);
		prop_assert!(CapacityPolicy::DEFAULT.allocation_size(len) <= cap.max(64));
		prop_assert!(CapacityPolicy::REASONABLY_SMALL.allocation_size(len) <= cap.max(8));
	}
}
