//! Domain types, configuration and persistence

pub mod config;
pub mod credentials;
pub mod models;
pub mod selection;
pub mod storage;
