//! Authentication primitives - JWT, password hashing, one-time codes

mod jwt;
mod otp;
mod password;

pub use jwt::{Claims, JwtService, TokenPair, TokenType};
pub use otp::{generate_numeric_code, generate_share_token};
pub use password::{hash_password, validate_password_strength, verify_password};
