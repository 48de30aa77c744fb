//! Meet2Jira app shell: the web surface, configuration, and the wiring
//! between the pure core and the backend engine.
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod server;
pub mod ui;

pub use dispatch::Dispatcher;
pub use server::build_router;
