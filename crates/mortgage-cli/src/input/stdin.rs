use std::io::{self, Read};

use mortgage_core::analysis::LoanInput;

/// Loan terms piped on stdin, if any.
///
/// Returns None when stdin is a terminal or the pipe is empty, so the
/// caller can fall back to command-line flags.
pub fn read_stdin_input() -> Result<Option<LoanInput>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    log::debug!("reading loan terms from stdin ({} bytes)", trimmed.len());
    let loan_input = LoanInput::from_json(trimmed)
        .map_err(|e| format!("Failed to parse loan terms from stdin: {e}"))?;
    Ok(Some(loan_input))
}
