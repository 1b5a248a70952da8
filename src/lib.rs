// cargo watch -x 'fmt' -x 'run'

pub mod azure;
pub mod config;
pub mod models;
pub mod output;
pub mod provider;
pub mod workflow;

pub use config::{DemoPlan, Settings};
pub use provider::Provider;
pub use workflow::{run_demo, DemoReport, TeardownTarget};
