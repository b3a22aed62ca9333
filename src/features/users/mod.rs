//! Account storage and administration.
//!
//! Accounts are created through `/api/auth/register`; this feature owns the
//! `users` table and the admin endpoints that approve accounts and assign packages.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/users` | Admin | List accounts |
//! | POST | `/api/admin/users/{id}/approve` | Admin | Approve an account |
//! | PUT | `/api/admin/users/{id}/package` | Admin | Assign package and role |
//! | DELETE | `/api/admin/users/{id}` | Admin | Delete an account |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
