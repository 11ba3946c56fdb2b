pub mod setup;
pub mod stream;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
#[allow(unused_imports)]
pub use stream::EventStreamReader;
