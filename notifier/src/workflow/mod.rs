pub mod config;
pub mod lists;
pub mod runner;
