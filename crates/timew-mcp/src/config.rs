//! Server configuration.

use std::fmt;

use clap::ValueEnum;
use timew_exec::{ShellRunner, DEFAULT_SHELL, DEFAULT_TIMEW_BIN};

/// How the MCP server talks to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// JSON-RPC over stdin/stdout.
    Stdio,

    /// Streamable HTTP, mounted at `/mcp`.
    Http,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => f.write_str("stdio"),
            Transport::Http => f.write_str("http"),
        }
    }
}

/// Server configuration, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Path or name of the `timew` executable.
    pub timew_bin: String,

    /// POSIX shell used to run command lines.
    pub shell: String,

    /// Transport to serve on.
    pub transport: Transport,

    /// Bind address for the HTTP transport.
    pub http_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            timew_bin: DEFAULT_TIMEW_BIN.to_string(),
            shell: DEFAULT_SHELL.to_string(),
            transport: Transport::Stdio,
            http_addr: "127.0.0.1:8765".to_string(),
        }
    }
}

impl ServerConfig {
    /// Build the runner every tool call goes through.
    pub fn runner(&self) -> ShellRunner {
        ShellRunner::new(&self.timew_bin).with_shell(&self.shell)
    }
}
