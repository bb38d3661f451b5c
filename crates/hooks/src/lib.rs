pub mod error;
pub mod hook_chain;
pub mod interception;

pub use error::HookError;
pub use hook_chain::{Hook, HookChain};
pub use interception::{as_hook, apply_interceptions, InterceptionApplication, InterceptionRecord, MessageInterception};
