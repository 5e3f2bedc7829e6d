//! Session tokens and password hashing for the dashboard

pub mod jwt;
pub mod password;

pub use jwt::{JwtClaims, JwtError, JwtValidator, SESSION_ISSUER};
pub use password::{
    check_strength, hash_password, verify_password, PasswordError, MIN_PASSWORD_LENGTH,
};
