//! Verified token claims

use std::collections::BTreeSet;

use super::permission::Permission;

/// Identity and permissions extracted from a verified token.
///
/// Built fresh for every request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject: String,
    pub issuer: String,
    pub audience: Vec<String>,
    /// Expiration timestamp (Unix epoch)
    pub expires_at: i64,
    pub permissions: BTreeSet<String>,
}

impl Claims {
    /// Exact string membership; no wildcards or hierarchy
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(permission.as_str())
    }
}
