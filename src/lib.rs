//! Host telemetry: a JSON metrics server over the local machine and a terminal
//! dashboard that polls it.

pub mod action;
pub mod app;
pub mod client;
pub mod config;
pub mod domain;
pub mod event;
pub mod format;
pub mod metrics;
pub mod server;
pub mod system;
pub mod telemetry;
pub mod ui;
