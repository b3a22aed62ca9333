//! Account authentication.
//!
//! Passwords are hashed with Argon2 and sessions are stateless HS256 access
//! tokens; `JwtValidator` is used by the auth middleware to resolve the
//! `AuthenticatedUser` for protected routes.

mod validator;

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use validator::JwtValidator;
