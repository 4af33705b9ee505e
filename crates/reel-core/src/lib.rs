pub mod config;
pub mod core;
pub mod debounce;
pub mod error;
pub mod movie;
pub mod platform;
pub mod search;
pub mod state;
pub mod tmdb;
pub mod trending;
