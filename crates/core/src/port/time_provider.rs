// Time Provider Port (for testability)

use thiserror::Error;

/// Why the current time could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("system clock reads {secs}s, before the Unix epoch")]
    BeforeEpoch { secs: i64 },

    #[error("time source unavailable: {0}")]
    Unavailable(String),
}

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in whole seconds since epoch
    ///
    /// Failure is an error, never a zero timestamp.
    fn now_secs(&self) -> Result<u64, TimeError>;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_secs(&self) -> Result<u64, TimeError> {
        let secs = chrono::Utc::now().timestamp();
        u64::try_from(secs).map_err(|_| TimeError::BeforeEpoch { secs })
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock frozen at a settable instant
    pub struct FixedTimeProvider {
        secs: AtomicU64,
    }

    impl FixedTimeProvider {
        pub fn new(secs: u64) -> Self {
            Self {
                secs: AtomicU64::new(secs),
            }
        }

        pub fn set(&self, secs: u64) {
            self.secs.store(secs, Ordering::SeqCst);
        }

        pub fn advance(&self, secs: u64) {
            self.secs.fetch_add(secs, Ordering::SeqCst);
        }
    }

    impl TimeProvider for FixedTimeProvider {
        fn now_secs(&self) -> Result<u64, TimeError> {
            Ok(self.secs.load(Ordering::SeqCst))
        }
    }

    /// Clock that always fails (fault injection)
    pub struct FailingTimeProvider;

    impl TimeProvider for FailingTimeProvider {
        fn now_secs(&self) -> Result<u64, TimeError> {
            Err(TimeError::Unavailable("injected failure".to_string()))
        }
    }
}
