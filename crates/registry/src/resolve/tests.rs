use proptest::prelude::*;
use rstest::rstest;

use super::*;

fn binding(name: &'static str, mask: u32) -> Binding<&'static str> {
	Binding::scoped("Foo", ProfileSet::from_mask(mask), name)
}

#[rstest]
#[case(0, [true, false, false, false, false])]
#[case(1, [true, true, false, false, false])]
#[case(3, [true, true, true, false, true])]
#[case(7, [true, true, true, true, true])]
fn validity_truth_table(#[case] active: u32, #[case] expected: [bool; 5]) {
	let required = [0, 1, 2, 4, 3];
	for (mask, want) in required.into_iter().zip(expected) {
		assert_eq!(
			is_valid(&binding("x", mask), ProfileSet::from_mask(active)),
			want,
			"requirement {mask:#b} under active {active:#b}"
		);
	}
}

#[test]
fn empty_list_is_missing() {
	let none: [Binding<&str>; 0] = [];
	assert!(matches!(resolve_in(&none, ProfileSet::ANY), Resolution::Missing));
	assert!(find_valid(&none, ProfileSet::ANY).is_none());
}

#[test]
fn single_valid_candidate_resolves() {
	let list = [binding("a", 0), binding("b", 2)];
	let found = find_valid(&list, ProfileSet::from_mask(1)).expect("a is the only valid binding");
	assert_eq!(*found.implementation(), "a");
}

#[test]
fn second_valid_candidate_discards_the_first() {
	let list = [binding("a", 0), binding("b", 2)];
	let resolution = resolve_in(&list, ProfileSet::from_mask(2));
	match resolution {
		Resolution::Ambiguous { first, second } => {
			assert_eq!(*first.implementation(), "a");
			assert_eq!(*second.implementation(), "b");
		}
		other => panic!("expected ambiguity, got {other:?}"),
	}
	assert!(resolution.unique().is_none());
}

#[test]
fn invalid_candidates_do_not_count_towards_ambiguity() {
	let list = [binding("a", 4), binding("b", 2), binding("c", 1)];
	let found = find_valid(&list, ProfileSet::from_mask(1));
	assert_eq!(found.map(|b| *b.implementation()), Some("c"));
}

fn arb_masks() -> impl Strategy<Value = Vec<u32>> {
	prop::collection::vec(0u32..16, 0..8)
}

proptest! {
	/// Resolution depends only on how many candidates are valid, never on order.
	#[test]
	fn prop_resolution_counts_valid_candidates(masks in arb_masks(), active in 0u32..16, seed in any::<u64>()) {
		let active = ProfileSet::from_mask(active);
		let list: Vec<_> = masks
			.iter()
			.enumerate()
			.map(|(i, mask)| Binding::scoped("Foo", ProfileSet::from_mask(*mask), i))
			.collect();
		let valid: Vec<usize> = list
			.iter()
			.filter(|b| is_valid(b, active))
			.map(|b| *b.implementation())
			.collect();

		let mut shuffled = list.clone();
		let len = shuffled.len().max(1);
		shuffled.rotate_left((seed as usize) % len);
		shuffled.reverse();

		for candidates in [&list, &shuffled] {
			let found = find_valid(candidates, active).map(|b| *b.implementation());
			match valid.len() {
				1 => prop_assert_eq!(found, Some(valid[0])),
				_ => prop_assert_eq!(found, None),
			}
		}
	}

	/// Validity is exactly the raw subset test.
	#[test]
	fn prop_validity_is_subset_test(required in any::<u32>(), active in any::<u32>()) {
		let b = Binding::scoped("Foo", ProfileSet::from_mask(required), ());
		let expected = required == 0 || (active & required) == required;
		prop_assert_eq!(is_valid(&b, ProfileSet::from_mask(active)), expected);
	}
}
