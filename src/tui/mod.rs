pub mod app;
mod auth;
mod chrome;
mod search;
mod status;
mod upload;
