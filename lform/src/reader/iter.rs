use std::io;

/// Iterator over characters that keeps track of line and column position.
///
/// The column is that of the most recently returned character, so it is 0
/// before anything was read and right after a newline.
pub struct LineColIterator<I> {
    iter: I,

    /// Index of the current line. Characters in the first line of the input
    /// (before the first newline character) are in line 1.
    line: usize,

    /// Index of the current column. The first character in the input and any
    /// characters immediately following a newline character are in column 1.
    /// The column is 0 immediately after a newline character has been read.
    col: usize,
}

impl<I> LineColIterator<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    pub fn new(iter: I) -> LineColIterator<I> {
        LineColIterator {
            iter,
            line: 1,
            col: 0,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }
}

impl<I> Iterator for LineColIterator<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<io::Result<char>> {
        match self.iter.next() {
            None => None,
            Some(Ok('\n')) => {
                self.line += 1;
                self.col = 0;
                Some(Ok('\n'))
            }
            Some(Ok(c)) => {
                self.col += 1;
                Some(Ok(c))
            }
            Some(Err(e)) => Some(Err(e)),
        }
    }
}

/// Decodes UTF-8 from a byte iterator, one character at a time.
///
/// Malformed input is reported as an `InvalidData` I/O error.
pub struct Utf8Chars<I> {
    bytes: I,
}

impl<I> Utf8Chars<I>
where
    I: Iterator<Item = io::Result<u8>>,
{
    pub fn new(bytes: I) -> Self {
        Utf8Chars { bytes }
    }

    fn invalid() -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8")
    }
}

impl<I> Iterator for Utf8Chars<I>
where
    I: Iterator<Item = io::Result<u8>>,
{
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<io::Result<char>> {
        let first = match self.bytes.next()? {
            Ok(b) => b,
            Err(e) => return Some(Err(e)),
        };
        let width = match first {
            0x00..=0x7F => return Some(Ok(char::from(first))),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Some(Err(Self::invalid())),
        };
        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.bytes.next() {
                Some(Ok(b)) => *slot = b,
                Some(Err(e)) => return Some(Err(e)),
                None => return Some(Err(Self::invalid())),
            }
        }
        match std::str::from_utf8(&buf[..width]) {
            Ok(s) => s.chars().next().map(Ok),
            Err(_) => Some(Err(Self::invalid())),
        }
    }
}
