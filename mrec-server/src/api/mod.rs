//! HTTP API handlers for mrec-server

pub mod health;
pub mod recognize;
pub mod ui;

pub use health::health_routes;
pub use recognize::recognize_routes;
pub use ui::ui_routes;
