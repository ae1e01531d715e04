// Operator prompts: menu selection and the confirmation gate
//
// Both read a single line. The gate is checked by the caller before any
// destructive plan reaches the runner.

use std::io::{self, BufRead, Write};

pub const CONFIRMATION_TOKEN: &str = "yes";

/// Exact, case-insensitive match against "yes". Only the line ending is stripped.
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .trim_end_matches(['\r', '\n'])
        .eq_ignore_ascii_case(CONFIRMATION_TOKEN)
}

/// Ask for explicit confirmation before a destructive run.
///
/// EOF counts as "no".
pub fn confirm_destructive<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    writeln!(output, "\n THIS MAY DAMAGE THE DISK!")?;
    write!(output, "[!] Continue? (yes/no): ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

/// Prompt for a menu number and return the raw token.
pub fn read_selection<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "Select method [1-11]: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
