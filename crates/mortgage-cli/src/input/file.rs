use std::fs;
use std::path::{Path, PathBuf};

use mortgage_core::analysis::LoanInput;

/// Read loan terms from a JSON file.
///
/// Amounts and rates are JSON strings (`"principal": "200000"`) so they
/// reach the engine without passing through a float.
pub fn read_loan_input(path: &str) -> Result<LoanInput, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
    let loan_input = LoanInput::from_json(&contents)
        .map_err(|e| format!("Failed to parse loan terms in '{}': {}", resolved.display(), e))?;
    Ok(loan_input)
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.is_file() {
        return Err(format!("Input file not found: {}", resolved.display()).into());
    }

    Ok(resolved)
}
