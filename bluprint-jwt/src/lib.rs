// JWT claims and IAM sidecar authentication for Bluprint services

pub mod auth;
pub mod claims;
pub mod error;
pub mod token;

pub use auth::{Authenticator, RequestTarget, SidecarAuth, UnverifiedAuth};
pub use claims::{Role, UserClaims};
pub use error::{AuthError, JwtError, Result};
pub use token::{bearer_token, decode_unverified};

// Re-export jsonwebtoken types
pub use jsonwebtoken::{EncodingKey, Header, encode};
