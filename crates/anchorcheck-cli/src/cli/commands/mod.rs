//! CLI command handlers, one file per command.
//!
//! Verification code is blocking (libcurl), so handlers run it on
//! `spawn_blocking` and keep the async side for progress and Ctrl-C.

mod chunks;
mod compare;
mod completions;
mod digest;
mod record;
mod surveys;
mod verify;

pub use chunks::run_chunks;
pub use compare::run_compare;
pub use completions::{run_completions, run_man};
pub use digest::run_digest;
pub use record::run_record;
pub use surveys::run_surveys;
pub use verify::run_verify;
