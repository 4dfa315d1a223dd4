pub mod app;
pub mod config;
pub mod navigation;
pub mod search;
pub mod service;
pub mod ui;
