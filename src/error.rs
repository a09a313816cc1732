/// Errors that abort a run.
///
/// Every variant records the instruction pointer at which the condition was
/// detected so a host can point at the offending byte of the program.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// `<` was executed while the cursor was already on cell 0.
    #[error("Pointer moved left of cell 0 at instruction {ip}")]
    OutOfBounds { ip: usize },

    /// A `]` was found with no open `[` to close.
    #[error("Unmatched ']' at instruction {ip}")]
    UnbalancedLoop { ip: usize },

    /// The program ended while a `[` was still open. `ip` is the innermost one.
    #[error("Unterminated '[' at instruction {ip}")]
    UnterminatedLoop { ip: usize },

    /// `,` was executed after the input source reached end of stream.
    #[error("Input exhausted at instruction {ip}")]
    InputExhausted { ip: usize },

    /// The input source or output sink failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: std::io::Error,
    },
}

impl ExecutionError {
    /// Position in the instruction buffer the error refers to.
    pub fn ip(&self) -> usize {
        match self {
            ExecutionError::OutOfBounds { ip }
            | ExecutionError::UnbalancedLoop { ip }
            | ExecutionError::UnterminatedLoop { ip }
            | ExecutionError::InputExhausted { ip }
            | ExecutionError::Io { ip, .. } => *ip,
        }
    }
}
