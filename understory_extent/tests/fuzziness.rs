// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The process-wide fuzziness lives in its own test binary so that changing it cannot race
//! other tests.

use understory_extent::{
    DEFAULT_FUZZINESS, Extent, ExtentError, Fuzziness, default_fuzziness, set_default_fuzziness,
};

#[test]
fn global_default_and_local_override() {
    assert_eq!(default_fuzziness(), DEFAULT_FUZZINESS);

    let a = Extent::from_runs(&[(10.0, 5.0)]).unwrap();
    let b = Extent::from_runs(&[(10.0, 5.05)]).unwrap();
    assert!(!a.equals(&b, None));

    set_default_fuzziness(0.1).unwrap();
    assert!(a.equals(&b, None));
    // A local override is independent of the global default.
    assert!(!a.equals(&b, Some(Fuzziness::new(0.01).unwrap())));
    // Values built before the change keep their epsilon.
    let snapshot = Fuzziness::default();
    set_default_fuzziness(DEFAULT_FUZZINESS).unwrap();
    assert_eq!(snapshot.epsilon(), 0.1);
    assert!(!a.equals(&b, None));

    assert_eq!(
        set_default_fuzziness(-1.0),
        Err(ExtentError::InvalidFuzziness(-1.0))
    );
    assert_eq!(default_fuzziness(), DEFAULT_FUZZINESS);
}
