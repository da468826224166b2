//! Authentication infrastructure - bearer-token service

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
