pub mod controller;
pub mod format;
