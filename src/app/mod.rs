pub mod context;
pub mod error;
pub mod logging;
pub mod signal;

pub use context::AppContext;
pub use error::{Result, ScrapeError};
