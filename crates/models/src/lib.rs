pub mod laboratory;

pub use laboratory::{image_for_analysis_type, Laboratory, LaboratoryPayload};
