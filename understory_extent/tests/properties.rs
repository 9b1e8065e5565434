// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for extent invariants.

use proptest::prelude::*;
use understory_extent::Extent;

/// Runs with small integer lengths and sizes, some unconstrained.
fn runs() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((1_u8..6, prop::option::of(-20_i32..20)), 0..8).prop_map(|v| {
        v.into_iter()
            .map(|(l, s)| (f64::from(l), s.map_or(f64::NAN, f64::from)))
            .collect()
    })
}

fn same(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || (a - b).abs() < 1e-9
}

fn envelope(a: f64, b: f64) -> f64 {
    if a.is_nan() {
        b
    } else if b.is_nan() {
        a
    } else {
        a.max(b)
    }
}

proptest! {
    #[test]
    fn runs_are_canonical(r in runs()) {
        let e = Extent::from_runs(&r).unwrap();
        let sizes: Vec<f64> = e.iter().map(|b| b.size).collect();
        for pair in sizes.windows(2) {
            prop_assert!(!same(pair[0], pair[1]), "adjacent runs share a size: {:?}", sizes);
        }
        let total: f64 = r.iter().map(|(l, _)| l).sum();
        prop_assert_eq!(e.total_length(), total);
    }

    #[test]
    fn simplify_keeps_bounding_values(r in runs()) {
        let mut e = Extent::from_runs(&r).unwrap();
        let before = e.bounding_values();
        e.simplify();
        let after = e.bounding_values();
        prop_assert!(e.num_bounds() <= 1);
        prop_assert_eq!(before.total_length, after.total_length);
        prop_assert!(same(before.max_size, after.max_size));
    }

    #[test]
    fn separation_is_symmetric(a in runs(), b in runs(), p in -20_i32..20, allow in any::<bool>()) {
        let a = Extent::from_runs(&a).unwrap();
        let b = Extent::from_runs(&b).unwrap();
        let p = f64::from(p);
        let ab = a.separation(&b, p, allow, 1.0).unwrap();
        let ba = b.separation(&a, -p, allow, 1.0).unwrap();
        prop_assert!(same(ab, ba), "{} != {}", ab, ba);
        prop_assert!(ab >= 0.0);
    }

    #[test]
    fn combined_is_the_envelope(a in runs(), b in runs(), shift in -10_i32..10, lift in -5_i32..5) {
        let a = Extent::from_runs(&a).unwrap();
        let b = Extent::from_runs(&b).unwrap();
        let shift = f64::from(shift);
        let lift = f64::from(lift);
        let combined = a.combined_extent(&b, shift, lift, 1.0).unwrap();

        let start = shift.min(0.0);
        let end = a.total_length().max(shift + b.total_length());
        let mut x = start + 0.5;
        while x < end {
            let expected = envelope(a.size_at(x), b.size_at(x - shift) + lift);
            let got = combined.size_at(x - start);
            prop_assert!(same(expected, got), "at {}: expected {}, got {}", x, expected, got);
            x += 1.0;
        }
    }

    #[test]
    fn clone_is_independent(r in runs(), extra in 1_u8..4) {
        let original = Extent::from_runs(&r).unwrap();
        let count = original.num_bounds();
        let total = original.total_length();
        let mut copy = original.clone();
        copy.append_ls(f64::from(extra), 1000.0).unwrap();
        copy.scale(2.0).unwrap();
        prop_assert_eq!(original.num_bounds(), count);
        prop_assert_eq!(original.total_length(), total);
    }
}

#[test]
fn equal_sizes_merge_on_append() {
    let mut e = Extent::new();
    e.append_ls(10.0, 20.0).unwrap();
    e.append_ls(5.0, 20.0).unwrap();
    assert_eq!(e.num_bounds(), 1);
    assert_eq!(e.total_length(), 15.0);
}

#[test]
fn single_runs_separate_by_their_sum() {
    let mut a = Extent::new();
    a.append_ls(10.0, 10.0).unwrap();
    let b = a.clone();
    assert_eq!(a.separation(&b, 0.0, true, 1.0).unwrap(), 20.0);
}
