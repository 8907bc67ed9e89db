pub mod claims;
pub mod error;
pub mod factory;
pub mod issuer;
pub mod role_gate;
pub mod verifier;

pub use claims::IdentityClaim;
pub use error::AuthError;
pub use factory::{build_token_issuer, build_token_verifier};
pub use issuer::TokenIssuer;
pub use role_gate::RoleGate;
pub use verifier::TokenVerifier;
