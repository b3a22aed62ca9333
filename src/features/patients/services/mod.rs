mod patient_service;

pub use patient_service::PatientService;
