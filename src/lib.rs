pub mod action;
pub mod config;
pub mod error;
pub mod platform;
pub mod workflow;
