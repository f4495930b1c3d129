
mod auth;
mod gemini;
mod judge;
mod submission;
