//! API middleware components

pub mod permission;

pub use permission::{guarded, require_permission, PermissionGuard};
