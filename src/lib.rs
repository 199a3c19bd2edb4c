pub mod app;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod flight;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod selection;
pub mod state;
pub mod storage;
pub mod summary;
pub mod ui;
pub mod uploader;
pub mod webhook;

pub use app::router;
pub use config::Config;
pub use state::AppState;
