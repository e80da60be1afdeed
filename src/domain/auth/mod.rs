//! Authorization domain module
//!
//! Every protected operation declares exactly one required permission.
//! A request passes when its verified token carries that exact string.

mod claims;
mod error;
mod guard;
mod permission;

pub use claims::Claims;
pub use error::{AuthError, AuthErrorKind};
pub use guard::{authorize, bearer_token, TokenVerifier};
pub use permission::{Permission, Role};
