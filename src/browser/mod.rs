//! Browser session management
//!
//! - LaunchOptions / ConnectionOptions: how to obtain a browser
//! - BrowserSession: one Chrome instance driven over CDP
//! - PageDriver: the primitives the pipeline uses, implemented by the session

pub mod config;
pub mod driver;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use driver::PageDriver;
pub use session::BrowserSession;
