//! Authentication module
//!
//! JWT bearer tokens carrying the caller's role, with argon2 password hashing.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::{AdminUser, AuthUser};
pub use password::PasswordService;
