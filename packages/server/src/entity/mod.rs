pub mod problem;
pub mod submission;
pub mod user;
