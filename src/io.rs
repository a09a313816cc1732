use std::fmt;
use std::io::{self, BufReader, ErrorKind, Read, Write};
use std::str::FromStr;

/// How `.` renders a cell on the output sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputEncoding {
    /// One raw octet per cell.
    #[default]
    Byte,
    /// The cell taken as a Unicode scalar value and written as UTF-8, so
    /// 128..=255 produce two bytes.
    #[value(name = "codepoint")]
    CodePoint,
}

impl FromStr for OutputEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "byte" | "raw" => Ok(OutputEncoding::Byte),
            "codepoint" | "code_point" | "code-point" | "unicode" => Ok(OutputEncoding::CodePoint),
            other => Err(format!("unknown output encoding '{other}' (expected 'byte' or 'codepoint')")),
        }
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputEncoding::Byte => write!(f, "byte"),
            OutputEncoding::CodePoint => write!(f, "codepoint"),
        }
    }
}

/// The byte source and sink used by `,` and `.`.
pub struct ByteIo<'a> {
    input: Box<dyn Read + 'a>,
    output: Box<dyn Write + 'a>,
    encoding: OutputEncoding,
}

impl<'a> ByteIo<'a> {
    pub fn new<R, W>(input: R, output: W) -> Self
    where
        R: Read + 'a,
        W: Write + 'a,
    {
        Self {
            input: Box::new(BufReader::new(input)),
            output: Box::new(output),
            encoding: OutputEncoding::default(),
        }
    }

    pub fn set_input<R: Read + 'a>(&mut self, input: R) {
        self.input = Box::new(BufReader::new(input));
    }

    pub fn set_output<W: Write + 'a>(&mut self, output: W) {
        self.output = Box::new(output);
    }

    pub fn set_encoding(&mut self, encoding: OutputEncoding) {
        self.encoding = encoding;
    }

    pub fn encoding(&self) -> OutputEncoding {
        self.encoding
    }

    /// Read exactly one byte. `Ok(None)` means the source is at end of stream.
    ///
    /// Pending output is flushed first so a prompt is visible before blocking.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.output.flush()?;
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Render one cell according to the configured encoding.
    pub fn write_cell(&mut self, value: u8) -> io::Result<()> {
        match self.encoding {
            OutputEncoding::Byte => self.output.write_all(&[value]),
            OutputEncoding::CodePoint => {
                let mut buf = [0u8; 4];
                let encoded = char::from(value).encode_utf8(&mut buf);
                self.output.write_all(encoded.as_bytes())
            }
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

impl ByteIo<'static> {
    /// Process stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl Default for ByteIo<'static> {
    fn default() -> Self {
        Self::stdio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_one_byte_at_a_time_then_eof() {
        let mut io = ByteIo::new(Cursor::new(b"AB".to_vec()), io::sink());
        assert_eq!(io.read_byte().unwrap(), Some(b'A'));
        assert_eq!(io.read_byte().unwrap(), Some(b'B'));
        assert_eq!(io.read_byte().unwrap(), None);
    }

    #[test]
    fn byte_encoding_writes_raw_octets() {
        let mut out = Vec::new();
        let mut io = ByteIo::new(io::empty(), &mut out);
        io.write_cell(b'@').unwrap();
        io.write_cell(200).unwrap();
        drop(io);
        assert_eq!(out, vec![b'@', 200]);
    }

    #[test]
    fn codepoint_encoding_writes_utf8() {
        let mut out = Vec::new();
        let mut io = ByteIo::new(io::empty(), &mut out);
        io.set_encoding(OutputEncoding::CodePoint);
        io.write_cell(b'A').unwrap();
        io.write_cell(0xE9).unwrap();
        drop(io);
        assert_eq!(out, "Aé".as_bytes());
    }

    #[test]
    fn parses_encoding_names() {
        assert_eq!("byte".parse::<OutputEncoding>().unwrap(), OutputEncoding::Byte);
        assert_eq!(" CodePoint ".parse::<OutputEncoding>().unwrap(), OutputEncoding::CodePoint);
        assert!("latin1".parse::<OutputEncoding>().is_err());
    }
}
