//! Authentication: password hashing, JWT issuing and the account flows
//! built on them (register, login, refresh, activation, password reset,
//! logout).

mod error;
mod password;
mod service;
mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use service::{AuthService, Registration, TokenPair};
pub use token::{Claims, JwtService, TokenKind};
