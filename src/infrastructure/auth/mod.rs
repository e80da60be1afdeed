//! Authentication infrastructure module
//!
//! Token verification against static or remote keys, and token signing
//! for local development.

mod jwks;
mod jwt;
mod keys;

pub use jwks::RemoteJwksProvider;
pub use jwt::{Audience, JwtClaims, JwtSigner, JwtVerifier, VerifierConfig};
pub use keys::{parse_algorithm, KeyProvider, StaticKeyProvider, VerificationKey};
