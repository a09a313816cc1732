use std::io::{Read, Write};

use crate::error::ExecutionError;
use crate::io::{ByteIo, OutputEncoding};
use crate::loop_stack::{LoopAction, LoopStack};
use crate::tape::Tape;
use crate::trace::TraceEvent;

/// A Brainfuck interpreter that finds loop boundaries as it runs.
///
/// There is no bracket pre-pass. Every `[` pushes a frame onto a
/// [`LoopStack`]; if the cell was zero the frame is marked as skipping and the
/// body is walked once with tape and I/O effects suppressed until its `]`
/// pops it. Bytes outside `><+-.,[]` are ignored.
///
/// ```
/// use tapebf::Interpreter;
///
/// let mut out = Vec::new();
/// let mut bf = Interpreter::new().with_input(&b""[..]).with_output(&mut out);
/// bf.load("++++++++[>++++++++<-]>.");
/// bf.execute().expect("program should run");
/// drop(bf);
/// assert_eq!(out, b"@");
/// ```
pub struct Interpreter<'a> {
    program: Vec<u8>,
    ip: usize,
    tape: Tape,
    loops: LoopStack,
    io: ByteIo<'a>,
    tracer: Option<Box<dyn FnMut(&TraceEvent) + 'a>>,
}

impl Interpreter<'static> {
    /// An interpreter wired to stdin and stdout with an empty program.
    pub fn new() -> Self {
        Self::with_io(ByteIo::stdio())
    }
}

impl Default for Interpreter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Interpreter<'a> {
    pub fn with_io(io: ByteIo<'a>) -> Self {
        Self {
            program: Vec::new(),
            ip: 0,
            tape: Tape::new(),
            loops: LoopStack::new(),
            io,
            tracer: None,
        }
    }

    /// Replace the byte source read by `,`.
    pub fn with_input<'b, R: Read + 'b>(self, input: R) -> Interpreter<'b>
    where
        'a: 'b,
    {
        let mut next: Interpreter<'b> = self;
        next.io.set_input(input);
        next
    }

    /// Replace the sink written by `.`.
    pub fn with_output<'b, W: Write + 'b>(self, output: W) -> Interpreter<'b>
    where
        'a: 'b,
    {
        let mut next: Interpreter<'b> = self;
        next.io.set_output(output);
        next
    }

    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.io.set_encoding(encoding);
        self
    }

    /// Install a callback invoked before every instruction, including bytes
    /// that turn out to be no-ops.
    pub fn set_tracer<F>(&mut self, tracer: F)
    where
        F: FnMut(&TraceEvent) + 'a,
    {
        self.tracer = Some(Box::new(tracer));
    }

    /// Load a program and reset the machine for a fresh run.
    pub fn load(&mut self, program: impl Into<Vec<u8>>) {
        self.program = program.into();
        self.ip = 0;
        self.tape = Tape::new();
        self.loops = LoopStack::new();
    }

    /// Run until the end of the program, then check that every `[` was closed.
    ///
    /// Output is flushed whether or not the run succeeds. The first error
    /// aborts the run; nothing is retried.
    pub fn execute(&mut self) -> Result<(), ExecutionError> {
        let result = self.run_to_end();
        let flushed = self
            .io
            .flush()
            .map_err(|source| ExecutionError::Io { ip: self.ip, source });
        result.and(flushed)
    }

    fn run_to_end(&mut self) -> Result<(), ExecutionError> {
        while self.step()? {}
        self.loops.assert_balanced()
    }

    /// Dispatch a single instruction.
    ///
    /// Returns `Ok(false)` once the instruction pointer is past the end of the
    /// program. Does not check loop balance; [`Interpreter::execute`] does
    /// that at the end.
    pub fn step(&mut self) -> Result<bool, ExecutionError> {
        let Some(&instr) = self.program.get(self.ip) else {
            return Ok(false);
        };
        let ip = self.ip;
        let skipping = self.loops.current_skip();

        if let Some(tracer) = self.tracer.as_mut() {
            tracer(&TraceEvent {
                ip,
                instruction: instr,
                cursor: self.tape.cursor(),
                cell: self.tape.current(),
                tape_len: self.tape.len(),
                skipping,
            });
        }

        match instr {
            b'>' if !skipping => self.tape.advance(),
            b'<' if !skipping => self.tape.retreat(ip)?,
            b'+' if !skipping => self.tape.increment(),
            b'-' if !skipping => self.tape.decrement(),
            b'.' if !skipping => {
                self.io
                    .write_cell(self.tape.current())
                    .map_err(|source| ExecutionError::Io { ip, source })?;
            }
            b',' if !skipping => match self.io.read_byte() {
                Ok(Some(byte)) => self.tape.write(byte),
                Ok(None) => return Err(ExecutionError::InputExhausted { ip }),
                Err(source) => return Err(ExecutionError::Io { ip, source }),
            },
            // Brackets run even while skipping so nesting stays tracked.
            b'[' => self.loops.open(ip, self.tape.current() == 0),
            b']' => {
                if let LoopAction::JumpTo(start) = self.loops.close(ip, self.tape.current())? {
                    // Land after the '[' so its frame is not pushed again.
                    self.ip = start + 1;
                    return Ok(true);
                }
            }
            // Suppressed instruction or a byte outside the instruction set.
            _ => {}
        }

        self.ip += 1;
        Ok(true)
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn instruction_pointer(&self) -> usize {
        self.ip
    }

    /// Open loops plus the root frame.
    pub fn loop_depth(&self) -> usize {
        self.loops.depth()
    }

    pub fn encoding(&self) -> OutputEncoding {
        self.io.encoding()
    }
}
