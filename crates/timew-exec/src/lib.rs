//! Timewarrior process execution
//!
//! This crate runs planned [`timew_core::CommandLine`]s as child processes.
//! The [`CommandRunner`] trait is the seam the MCP server depends on, so tests
//! can substitute a scripted runner for the real `timew` binary.
//!
//! # Example
//!
//! ```rust,no_run
//! use timew_core::StartRequest;
//! use timew_exec::{CommandRunner, ShellRunner};
//!
//! async fn start() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = ShellRunner::new("timew");
//!     let invocation = StartRequest::new(["work"]).plan()?;
//!
//!     let outcome = runner.run(invocation.command()).await?;
//!     println!("exit status: {:?}", outcome.exit_status);
//!     Ok(())
//! }
//! ```

mod error;
mod runner;

pub use error::ExecError;
pub use runner::{CommandRunner, ShellRunner, DEFAULT_SHELL, DEFAULT_TIMEW_BIN};
