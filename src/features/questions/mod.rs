//! Question lifecycle: asking, editing, answering, status changes and soft
//! deletion, with dual read-status tracking.
//!
//! Changes that concern another party record a notification in the outbox in
//! the same transaction; see `features::notifications` for delivery.
//!
//! ## Status transitions
//!
//! | From | Allowed targets |
//! |------|-----------------|
//! | pending | inProgress, answered, closed |
//! | inProgress | pending, answered, closed |
//! | answered | inProgress, closed |
//! | closed | pending |
//!
//! Answering is accepted from every non-deleted status; `deleted` is only
//! reached through `DELETE`.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/questions` | Yes | Ask a question |
//! | GET | `/api/questions` | Yes | List (status, sort, page, page_size) |
//! | GET | `/api/questions/pending` | Yes | Pending and in-progress questions |
//! | GET | `/api/questions/{id}` | Yes | Detail; marks viewed |
//! | PUT | `/api/questions/{id}/content` | Yes | Edit content |
//! | POST | `/api/questions/{id}/answer` | Yes | Answer |
//! | PATCH | `/api/questions/{id}/status` | Yes | Change status |
//! | DELETE | `/api/questions/{id}` | Yes | Soft delete |
//! | GET | `/api/users/{user_id}/questions` | Owner/Admin | Paginated history |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::QuestionService;
