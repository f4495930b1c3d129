pub mod auth;
pub mod meta;
pub mod problem;
pub mod stats;
pub mod submission;
