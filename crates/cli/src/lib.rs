//! Replay of recorded dashboard selection sessions.
//!
//! A session is a catalog (JSON array of items) plus a script (JSON array of
//! steps). Replaying applies each step to a fresh [`SelectionAggregator`] and
//! reports the final selection and totals.

pub mod args;
pub mod script;

pub use args::Args;
pub use script::{RejectedStep, Report, ScriptStep, load_catalog, parse_script, replay};
