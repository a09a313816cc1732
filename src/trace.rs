/// Interpreter state captured just before an instruction is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    pub ip: usize,
    /// The raw byte at `ip`; may be a non-instruction byte.
    pub instruction: u8,
    pub cursor: usize,
    pub cell: u8,
    /// Allocated tape size in cells.
    pub tape_len: usize,
    /// Whether the instruction will be suppressed by a skipping loop.
    pub skipping: bool,
}

/// Tracer used by the `--debug` flag: one `debug` event per instruction.
pub fn log_event(event: &TraceEvent) {
    tracing::debug!(
        target: "tapebf::trace",
        ip = event.ip,
        instr = %char::from(event.instruction).escape_default(),
        cursor = event.cursor,
        cell = event.cell,
        tape_len = event.tape_len,
        skipping = event.skipping,
        "exec"
    );
}
