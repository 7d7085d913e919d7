pub mod config;
pub mod display;
pub mod errors;
pub mod export;
pub mod parse;
pub mod runner;
pub mod sysinfo;
pub mod types;
