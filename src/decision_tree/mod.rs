pub mod config;
pub mod core;
pub mod predict;
pub mod setters;
