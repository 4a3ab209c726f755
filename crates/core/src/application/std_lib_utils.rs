//! Std Lib Utils - the operations table
//!
//! Callers reach the clock and string comparison through a `StdLibUtils`
//! reference, so tests can hand in a table built from fakes without touching
//! call sites. `get_std_lib_utils()` is the process-wide production table.

use crate::port::{
    OrdinalComparator, StringComparator, SystemTimeProvider, TimeError, TimeProvider,
};
use std::sync::{Arc, OnceLock};
use tracing::warn;

static STD_LIB_UTILS: OnceLock<StdLibUtils> = OnceLock::new();

/// Operations table: one substitutable port per operation
#[derive(Clone)]
pub struct StdLibUtils {
    time_provider: Arc<dyn TimeProvider>,
    string_comparator: Arc<dyn StringComparator>,
}

impl StdLibUtils {
    /// Create a table from injected ports
    ///
    /// # Example
    /// ```text
    /// let utils = StdLibUtils::new(
    ///     Arc::new(FixedTimeProvider::new(1_700_000_000)),
    ///     Arc::new(OrdinalComparator),
    /// );
    /// ```
    pub fn new(
        time_provider: Arc<dyn TimeProvider>,
        string_comparator: Arc<dyn StringComparator>,
    ) -> Self {
        Self {
            time_provider,
            string_comparator,
        }
    }

    /// Table backed by the system clock and ordinal comparison
    pub fn system() -> Self {
        Self::new(Arc::new(SystemTimeProvider), Arc::new(OrdinalComparator))
    }

    /// Whole seconds since the Unix epoch
    pub fn get_current_time(&self) -> Result<u64, TimeError> {
        self.time_provider.now_secs().map_err(|e| {
            warn!(error = %e, "Failed to read current time");
            e
        })
    }

    /// Ordinal equality of two strings
    pub fn are_strings_equal(&self, a: &str, b: &str) -> bool {
        self.string_comparator.are_equal(a, b)
    }

    pub fn time_provider(&self) -> &Arc<dyn TimeProvider> {
        &self.time_provider
    }

    pub fn string_comparator(&self) -> &Arc<dyn StringComparator> {
        &self.string_comparator
    }
}

impl std::fmt::Debug for StdLibUtils {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdLibUtils").finish_non_exhaustive()
    }
}

/// Process-wide operations table (initialized on first access)
pub fn get_std_lib_utils() -> &'static StdLibUtils {
    STD_LIB_UTILS.get_or_init(StdLibUtils::system)
}

/// Direct call through the process-wide table
pub fn get_current_time() -> Result<u64, TimeError> {
    get_std_lib_utils().get_current_time()
}

/// Direct call through the process-wide table
pub fn are_strings_equal(a: &str, b: &str) -> bool {
    get_std_lib_utils().are_strings_equal(a, b)
}
