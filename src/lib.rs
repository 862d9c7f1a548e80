//! IP Checker - IPv4 check service
//!
//! Validates an address, returns its geolocation from an external lookup
//! service and remembers every address it has checked, so a repeat request
//! is answered as a duplicate with the first-seen time instead of a second
//! lookup.
//!
//! # Architecture
//! - `utils`: address validation and time formatting
//! - `storage`: persisted record store (SeaORM; SQLite, MySQL, PostgreSQL)
//! - `services`: geolocation client, check orchestration, retention
//! - `api`: HTTP handlers and middleware
//! - `config`: configuration loading
//! - `runtime`: startup wiring, execution modes, shutdown
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
