pub mod config;
pub mod logging;

pub mod checksum;
pub mod control;
pub mod error;
pub mod report;
pub mod retry;
pub mod source;
pub mod verifier;
