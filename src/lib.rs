pub mod api;
pub mod config;
pub mod demo_backend;
pub mod forms;
pub mod http_api;
pub mod http_client;
pub mod state;
pub mod views;
pub mod worker;
