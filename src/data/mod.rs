//! Dataset access: the grouped Socrata query and the background job runner.

pub mod loader;
pub mod socrata;

pub use loader::{CancelToken, FetchHandle, FetchResult, TaskHandle};
pub use socrata::SalesClient;
