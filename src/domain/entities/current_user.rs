//! Authenticated caller context.

/// The user a request acts for.
///
/// Produced by the authentication middleware and passed explicitly to the
/// services that attribute or filter by ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub owner_id: String,
}

impl CurrentUser {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }
}
