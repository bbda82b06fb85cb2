pub mod app;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod shared;
pub mod store;
