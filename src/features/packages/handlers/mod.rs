pub mod package_handler;

pub use package_handler::{__path_list_packages, list_packages};
