// String Comparator Port (for testability)

/// String equality interface (allows substitution in tests)
pub trait StringComparator: Send + Sync {
    /// True iff `a` and `b` are equal
    fn are_equal(&self, a: &str, b: &str) -> bool;
}

/// Ordinal comparison: identical characters in identical order.
/// No case folding, trimming or Unicode normalization.
pub struct OrdinalComparator;

impl StringComparator for OrdinalComparator {
    fn are_equal(&self, a: &str, b: &str) -> bool {
        a == b
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Records every comparison, answers like `OrdinalComparator`
    #[derive(Default)]
    pub struct RecordingComparator {
        calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingComparator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone()
        }
    }

    impl StringComparator for RecordingComparator {
        fn are_equal(&self, a: &str, b: &str) -> bool {
            self.calls
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push((a.to_string(), b.to_string()));
            OrdinalComparator.are_equal(a, b)
        }
    }
}
