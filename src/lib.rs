pub mod config;
pub mod deboard;
pub mod error;
pub mod event;
pub mod service;
pub mod ui;
pub mod vim;
