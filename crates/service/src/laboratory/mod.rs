pub mod repository;
pub mod service;

pub use repository::{JsonFileLaboratoryRepository, LaboratoryRepository};
pub use service::LaboratoryService;
