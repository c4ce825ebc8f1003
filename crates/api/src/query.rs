//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;

/// Page-number pagination (`?page=N`, 1-based).
///
/// Used by the reservation history listing. A missing or out-of-range
/// value falls back to page 1 in the handler.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}
