pub mod account;
pub mod admin;
pub mod auth;
pub mod judge;
pub mod meta;
pub mod problem;
pub mod submission;
