pub mod account;
pub mod error;
pub mod jwt;
pub mod password;

pub use account::login_or_register;
pub use jwt::{decode_jwt, encode_jwt};
pub use password::{compute_password_hash, verify_password_hash};
