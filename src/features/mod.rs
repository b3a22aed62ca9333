pub mod auth;
pub mod notifications;
pub mod packages;
pub mod patients;
pub mod questions;
pub mod users;
