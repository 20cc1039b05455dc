pub mod dashboard;
pub mod data;
