pub mod analyze;
pub mod health;
pub mod photos;
pub mod upload;
