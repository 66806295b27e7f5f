use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::TransportError;

/// Sends serialized frames to a destination, one frame per line.
pub trait Sender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;
}

/// Sends data to standard output.
pub struct StdioSender {
    stdout: io::Stdout,
}

impl StdioSender {
    pub fn new() -> Self {
        StdioSender { stdout: io::stdout() }
    }
}

impl Default for StdioSender {
    fn default() -> Self {
        Self::new()
    }
}

impl Sender for StdioSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut handle = self.stdout.lock();
        handle.write_all(data)?;
        handle.write_all(b"\n")?;
        handle.flush()?; // Ensure it's written immediately
        Ok(())
    }
}

/// Writes frames to a file. Each frame is flushed as soon as it is sent,
/// so a host tailing the file sees it immediately.
pub struct FileSender {
    writer: BufWriter<File>,
}

impl FileSender {
    pub fn new(path: impl AsRef<Path>, append: bool) -> Result<Self, TransportError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Sender for FileSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.writer.write_all(data)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSender;

impl Sender for NullSender {
    fn send(&mut self, _data: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_sender_writes_one_line_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");

        let mut sender = FileSender::new(&path, false).unwrap();
        sender.send(b"first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\n");

        sender.send(b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn file_sender_appends_or_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");
        fs::write(&path, "old\n").unwrap();

        FileSender::new(&path, true).unwrap().send(b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");

        FileSender::new(&path, false).unwrap().send(b"fresh").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }
}
