//! Club desk: feedback intake and membership registration workflows served
//! over HTTP/JSON.

pub mod config;
pub mod error;
pub mod mail;
pub mod store;
pub mod telemetry;
pub mod workflows;
