mod outbox_processor;

pub use outbox_processor::{BatchReport, OutboxProcessor};
