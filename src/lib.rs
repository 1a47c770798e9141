pub mod app;
pub mod check;
pub mod config;
pub mod consts;
pub mod data;
pub mod deps;
pub mod device;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod runtime;
pub mod suite;

pub use check::{Check, Outcome, Verdict};
pub use errors::CheckError;
pub use pipeline::{Pipeline, RunSummary, StepResult};
