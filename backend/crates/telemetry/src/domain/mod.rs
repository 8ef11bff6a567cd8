pub mod aggregate;
pub mod record;
pub mod repository;
pub mod severity;
