//! Output helpers for CLI commands
//!
//! Command results go to stdout; logs keep their own JSON-line stream.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a success response as a single JSON line
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write plain lines, one per entry
pub fn write_lines<I, S>(lines: I) -> CliResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stdout = io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{}", line.as_ref())?;
    }
    stdout.flush()?;

    Ok(())
}
