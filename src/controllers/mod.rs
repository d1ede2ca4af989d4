pub mod auth;
pub mod chapters;
pub mod home;
pub mod me;
pub mod novels;
pub mod reading;
mod validation;
