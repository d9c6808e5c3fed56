//! CLI command handlers, one per file.

mod check;
mod fetch;
mod resolve;

pub use check::run_check;
pub use fetch::run_fetch;
pub use resolve::{run_resolve, ModelArgs};
