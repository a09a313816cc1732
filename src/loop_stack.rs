use crate::error::ExecutionError;

/// Bookkeeping for one open `[`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopFrame {
    /// Instruction pointer of the `[` that opened this frame.
    pub start: usize,
    /// Set when the cell was zero on entry: the body runs once as a scan with
    /// every effect suppressed.
    pub skip: bool,
}

/// What the dispatcher should do after a `]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    /// Fall through to the next instruction.
    Continue,
    /// Resume right after the `[` at this position.
    JumpTo(usize),
}

/// Stack of open loops, innermost on top.
///
/// The bottom entry is a root frame standing for "not inside any loop". It is
/// never popped and never skips, so `depth() == 1 + open brackets`.
#[derive(Debug, Clone)]
pub struct LoopStack {
    frames: Vec<LoopFrame>,
}

impl LoopStack {
    const ROOT: LoopFrame = LoopFrame { start: 0, skip: false };

    pub fn new() -> Self {
        Self { frames: vec![Self::ROOT] }
    }

    /// Push a frame for the `[` at `at`. Runs for every `[`, even inside a
    /// skipped body, so brackets keep pairing up.
    pub fn open(&mut self, at: usize, zero_now: bool) {
        self.frames.push(LoopFrame { start: at, skip: zero_now });
    }

    /// Resolve the `]` at `at` given the value of the current cell.
    ///
    /// A skipping frame is always popped. A live frame jumps back while the
    /// cell is nonzero and is reused for the next iteration; otherwise it is
    /// popped.
    pub fn close(&mut self, at: usize, cell: u8) -> Result<LoopAction, ExecutionError> {
        if self.frames.len() <= 1 {
            return Err(ExecutionError::UnbalancedLoop { ip: at });
        }
        let top = self.top();
        if !top.skip && cell != 0 {
            return Ok(LoopAction::JumpTo(top.start));
        }
        self.frames.pop();
        Ok(LoopAction::Continue)
    }

    /// Whether effectful instructions are currently suppressed.
    pub fn current_skip(&self) -> bool {
        self.top().skip
    }

    /// Fails with the innermost unmatched `[` if any loop is still open.
    pub fn assert_balanced(&self) -> Result<(), ExecutionError> {
        if self.frames.len() > 1 {
            return Err(ExecutionError::UnterminatedLoop { ip: self.top().start });
        }
        Ok(())
    }

    /// Number of frames including the root.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn top(&self) -> LoopFrame {
        // The root frame is never popped, so there is always a top.
        self.frames.last().copied().unwrap_or(Self::ROOT)
    }
}

impl Default for LoopStack {
    fn default() -> Self {
        Self::new()
    }
}
