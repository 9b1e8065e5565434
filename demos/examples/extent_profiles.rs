// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extent profiles.
//!
//! Build two silhouettes, measure how far apart they must sit, and fold one into the other.
//!
//! Run:
//! - `cargo run -p understory_demos --example extent_profiles`

use understory_extent::{Extent, Fuzziness};

fn print(name: &str, extent: &Extent) {
    let runs: Vec<String> = extent
        .iter()
        .map(|b| format!("({}, {})", b.length, b.size))
        .collect();
    println!("{name}: {}", runs.join(" "));
}

fn main() {
    // A staircase reaching further out the lower it goes.
    let stairs = Extent::from_runs(&[(10.0, 5.0), (10.0, 15.0), (10.0, 25.0)]).unwrap();
    // A box with a gap in the middle.
    let notched = Extent::from_runs(&[(10.0, 10.0), (10.0, f64::NAN), (10.0, 10.0)]).unwrap();
    print("stairs", &stairs);
    print("notched", &notched);

    for offset in [-10.0, 0.0, 10.0] {
        let allowed = stairs.separation(&notched, offset, true, 1.0).unwrap();
        let prevented = stairs.separation(&notched, offset, false, 1.0).unwrap();
        println!("offset {offset:>5}: separation {allowed} (overlap allowed), {prevented} (prevented)");
    }

    let merged = stairs.combined_extent(&notched, 15.0, -20.0, 1.0).unwrap();
    print("merged", &merged);

    let mut loose = merged.clone();
    loose.simplify();
    print("simplified", &loose);
    assert_eq!(loose.bounding_values().max_size, merged.bounding_values().max_size);

    let mut nudged = merged.clone();
    nudged.adjust_size(1e-9);
    let tolerance = Fuzziness::new(1e-6).unwrap();
    assert!(nudged.equals(&merged, Some(tolerance)));
    assert!(!nudged.equals(&merged, Some(Fuzziness::EXACT)));
    println!("merged equals its nudged copy within {}", tolerance.epsilon());
}
