//! Console output with quiet-mode support.
//!
//! Progress and summary lines go to stdout and are suppressed by `--quiet`;
//! warnings and errors go to stderr. Errors are always printed.

use std::fmt::Display;
use std::io::{self, Write};

/// Context for controlling output verbosity
pub struct OutputContext {
    quiet: bool,
}

impl OutputContext {
    /// Create a new output context
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print informational message (suppressed by --quiet)
    pub fn print_info(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print success message (suppressed by --quiet)
    pub fn print_success(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print warning (suppressed by --quiet)
    pub fn print_warning(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet {
            writeln_safe_stderr(&format!("Warning: {}", msg))
        } else {
            Ok(())
        }
    }

    /// Print error (always shown to stderr)
    pub fn print_error(&self, msg: impl Display) -> io::Result<()> {
        writeln_safe_stderr(&format!("Error: {}", msg))
    }
}

/// Safe println that handles broken pipes gracefully
fn writeln_safe(msg: &str) -> io::Result<()> {
    match writeln!(io::stdout(), "{}", msg) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            // Silently exit on broken pipe (expected when piping to head, etc.)
            std::process::exit(0);
        }
        Err(e) => Err(e),
    }
}

/// Safe eprintln that handles broken pipes gracefully
fn writeln_safe_stderr(msg: &str) -> io::Result<()> {
    match writeln!(io::stderr(), "{}", msg) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            // Silently exit on broken pipe
            std::process::exit(0);
        }
        Err(e) => Err(e),
    }
}
