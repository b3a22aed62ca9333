pub mod patient_handler;

pub use patient_handler::{
    __path_create_patient, __path_delete_patient, __path_list_patients, __path_update_patient,
    create_patient, delete_patient, list_patients, update_patient,
};
