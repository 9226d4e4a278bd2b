//! Admin authentication: credential check, JWT issuance and verification.

pub mod handlers;
pub mod middleware;
pub mod service;

pub use middleware::{bearer_token, jwt_auth_middleware};
pub use service::{AuthService, Claims, LoginResponse, Principal, hash_password};
