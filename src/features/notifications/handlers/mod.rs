pub mod notification_handler;

pub use notification_handler::{
    __path_clear_bell, __path_get_unread_count, __path_list_notifications,
    __path_mark_notification_read, clear_bell, get_unread_count, list_notifications,
    mark_notification_read,
};
