pub mod app;
pub mod authz;
pub mod config;
pub mod db;
pub mod directory;
pub mod docs;
pub mod errors;
pub mod models;
pub mod routes;
pub mod session;
pub mod utils;

// Re-export commonly used items for tests
pub use app::{create_app, router, AppState};
