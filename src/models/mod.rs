pub mod consultation;
pub mod enums;
pub mod fields;
pub mod lab;
pub mod patient;
pub mod vital_sign;

pub use consultation::ConsultationRecord;
pub use enums::{ChronicCategory, Clearance, RiskLevel};
pub use lab::LabResult;
pub use patient::{Patient, UNKNOWN_DEPARTMENT};
pub use vital_sign::{BloodPressure, BloodPressureInput, VitalRecord};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
