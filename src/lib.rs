pub mod artifact;
pub mod config;
pub mod error;
pub mod github;
pub mod report;
pub mod risk;
pub mod run;
pub mod snapshot;
