// src/jules/mod.rs

pub mod agent;
pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod generation;
pub mod prompt;
pub mod shell;
