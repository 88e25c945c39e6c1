//! Test harness for CLI integration tests.
//!
//! Provides isolated site directories, programmatic page creation,
//! and CLI assertion helpers using `assert_cmd`.

mod command;
mod env;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::ChanzeroCommand;
#[allow(unused_imports)]
pub use env::TestSite;
#[allow(unused_imports)]
pub use page::TestPage;
