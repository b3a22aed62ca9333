pub mod user_handler;

pub use user_handler::{
    __path_approve_user, __path_delete_user, __path_list_users, __path_set_package,
    approve_user, delete_user, list_users, set_package,
};
