mod auth;
mod home;
mod me;
mod reading;
