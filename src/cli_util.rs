use std::io::{self, Write};

use crate::ExecutionError;

/// Bytes of program shown on each side of the failing instruction.
const WINDOW_BYTES: usize = 32;

/// Print an execution error followed by the surrounding program bytes and a
/// caret under the failing instruction.
/// If `program` is `Some("tapebf")`, the first line is prefixed with it.
pub fn print_execution_error(program: Option<&str>, code: &[u8], err: &ExecutionError) {
    let mut stderr = io::stderr().lock();
    let _ = write_execution_error(&mut stderr, program, code, err);
    let _ = stderr.flush();
}

/// Same as [`print_execution_error`] but to any writer.
pub fn write_execution_error<W: Write>(
    out: &mut W,
    program: Option<&str>,
    code: &[u8],
    err: &ExecutionError,
) -> io::Result<()> {
    match program {
        Some(p) => writeln!(out, "{p}: {err}")?,
        None => writeln!(out, "{err}")?,
    }

    let pos = err.ip();
    if pos >= code.len() {
        return Ok(());
    }

    let start = pos.saturating_sub(WINDOW_BYTES);
    let end = (pos + WINDOW_BYTES + 1).min(code.len());

    // Newlines and tabs would break the caret alignment.
    let render = |bytes: &[u8]| -> String {
        String::from_utf8_lossy(bytes)
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect()
    };
    let before = render(&code[start..pos]);
    let rest = render(&code[pos..end]);

    writeln!(out, "  {before}{rest}")?;
    writeln!(out, "  {}^", " ".repeat(before.chars().count()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(code: &[u8], err: &ExecutionError) -> String {
        let mut buf = Vec::new();
        write_execution_error(&mut buf, Some("tapebf"), code, err).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn caret_points_at_failing_byte() {
        let text = rendered(b"+>]", &ExecutionError::UnbalancedLoop { ip: 2 });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "tapebf: Unmatched ']' at instruction 2");
        assert_eq!(lines[1], "  +>]");
        assert_eq!(lines[2], "    ^");
    }

    #[test]
    fn long_programs_are_windowed() {
        let code = format!("{}<{}", "+".repeat(100), "-".repeat(100));
        let text = rendered(code.as_bytes(), &ExecutionError::OutOfBounds { ip: 100 });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1].len(), 2 + 2 * WINDOW_BYTES + 1);
        assert_eq!(lines[2].len(), 2 + WINDOW_BYTES + 1);
        assert!(lines[2].ends_with('^'));
    }

    #[test]
    fn newlines_do_not_break_alignment() {
        let text = rendered(b"+\n<", &ExecutionError::OutOfBounds { ip: 2 });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "  + <");
        assert_eq!(lines[2], "    ^");
    }

    #[test]
    fn position_past_end_prints_message_only() {
        let text = rendered(b"", &ExecutionError::InputExhausted { ip: 0 });
        assert_eq!(text, "tapebf: Input exhausted at instruction 0\n");
    }
}
