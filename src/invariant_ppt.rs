//! # Runtime Invariants
//!
//! Scanner checks its descriptor invariants (absolute paths, names stripped of the
//! extension) through [`assert_invariant`]. Tests then call [`contract_test`] to prove
//! the checks actually ran, not just that the output happened to look right.

use std::collections::HashSet;
use std::sync::Mutex;
use lazy_static::lazy_static;
use log::error;

lazy_static! {
    /// Descriptions of every invariant that has held at least once in this process.
    static ref CHECKED_INVARIANTS: Mutex<HashSet<&'static str>> = Mutex::new(HashSet::new());
}

/// Asserts that `condition` holds.
///
/// A violation panics in debug and test builds. Release builds log it and carry on;
/// a launcher that lists one odd entry is better than one that refuses to start.
pub fn assert_invariant(condition: bool, description: &'static str, component: &str) {
    if condition {
        if let Ok(mut set) = CHECKED_INVARIANTS.lock() {
            set.insert(description);
        }
        return;
    }

    let msg = format!("Invariant violated [{}]: {}", component, description);
    error!("{}", msg);
    if cfg!(debug_assertions) || cfg!(test) {
        panic!("{}", msg);
    }
}

/// Panics unless every description in `required` was asserted (and held) earlier.
#[cfg(test)]
pub fn contract_test(context: &str, required: &[&str]) {
    let missing: Vec<String> = {
        let checked = CHECKED_INVARIANTS.lock().unwrap_or_else(|e| e.into_inner());
        required
            .iter()
            .filter(|req| !checked.contains(*req))
            .map(|req| req.to_string())
            .collect()
    };

    // Guard is released above so a failed contract does not poison the log.
    assert!(
        missing.is_empty(),
        "Contract '{}' failed. These invariants were never checked:\n{:#?}",
        context,
        missing
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_invariant_is_recorded() {
        assert_invariant(true, "invariant_ppt self-check", "Tests");
        contract_test("self-check", &["invariant_ppt self-check"]);
    }

    #[test]
    #[should_panic(expected = "Invariant violated [Tests]")]
    fn test_violation_panics_in_tests() {
        assert_invariant(false, "invariant_ppt must panic", "Tests");
    }

    #[test]
    #[should_panic(expected = "never checked")]
    fn test_contract_reports_missing() {
        contract_test("missing", &["an invariant nobody asserts"]);
    }
}
