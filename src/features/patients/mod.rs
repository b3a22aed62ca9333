//! Patient case records attached to consultations.
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/patients` | Yes | Create a patient record |
//! | GET | `/api/patients` | Yes | List patient records |
//! | PUT | `/api/patients/{id}` | Yes | Replace the clinical fields |
//! | DELETE | `/api/patients/{id}` | Yes | Delete a patient record |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PatientService;
