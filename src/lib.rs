//! A Brainfuck interpreter built around a paged tape and a loop stack.
//!
//! Features and behaviors:
//! - The tape starts as one page of 1024 zeroed cells and grows to the right a
//!   page at a time; moving left from cell 0 is an error.
//! - Cells are `u8` and wrap on `+` and `-`.
//! - Loops are resolved while running. There is no bracket pre-pass: a `[`
//!   on a zero cell still walks its body once, with every effect suppressed,
//!   to find the matching `]`.
//! - Unmatched `]` fails when it is reached; unmatched `[` fails when the
//!   program ends.
//! - `,` reads one byte; end of input is an error.
//! - `.` writes the cell as a raw byte, or as a UTF-8 encoded code point with
//!   [`OutputEncoding::CodePoint`].
//! - Any byte outside `><+-.,[]` is ignored.
//!
//! Quick start:
//!
//! ```
//! let mut out = Vec::new();
//! tapebf::run(b"++++++++[>++++++++<-]>.", &b""[..], &mut out).expect("program should run");
//! assert_eq!(out, b"@");
//! ```

pub mod cli_util;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod io;
pub mod loop_stack;
pub mod tape;
pub mod trace;

pub use error::ExecutionError;
pub use interpreter::Interpreter;
pub use io::{ByteIo, OutputEncoding};
pub use loop_stack::{LoopAction, LoopFrame, LoopStack};
pub use tape::Tape;
pub use trace::TraceEvent;

/// Run `program` once against `input` and `output` with default settings.
pub fn run<'a, R, W>(program: &[u8], input: R, output: W) -> Result<(), ExecutionError>
where
    R: std::io::Read + 'a,
    W: std::io::Write + 'a,
{
    let mut bf = Interpreter::with_io(ByteIo::new(input, output));
    bf.load(program);
    bf.execute()
}
