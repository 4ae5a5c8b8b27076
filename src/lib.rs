pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod signing;
pub mod state;

pub use api::router;
pub use state::AppState;
