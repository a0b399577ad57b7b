pub mod candidate;
pub mod chapter;
pub mod classify;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod source;
pub mod util;
