pub mod config;
pub mod input;
pub mod marksheet;
pub mod output;
pub mod snapshot;
