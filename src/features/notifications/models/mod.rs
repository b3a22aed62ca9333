mod notification;
mod outbox;

pub use notification::*;
pub use outbox::*;
