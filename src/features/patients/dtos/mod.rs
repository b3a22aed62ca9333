mod patient_dto;

pub use patient_dto::*;
