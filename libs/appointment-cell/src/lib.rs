pub mod codec;
pub mod models;
pub mod repository;
pub mod services;

// Re-export the core types for external use
pub use models::*;
pub use repository::AppointmentRepository;
pub use services::{AppointmentFilter, MutationService};
