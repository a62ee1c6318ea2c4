pub mod config;
pub mod install;
pub mod release;
pub mod setup;
