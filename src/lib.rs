use std::{
    collections::TryReserveError,
    fs,
    io::{self, BufRead, Write},
    path::Path,
};
#[cfg(not(unix))]
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReverseError {
    #[error("cannot open file '{0}'")]
    CannotOpen(String),
    #[error("input and output file must differ")]
    SameFile,
    #[error("malloc failed")]
    OutOfMemory(#[from] TryReserveError),
    #[error("{0}")]
    Io(#[from] io::Error),
}

pub struct LineStore {
    lines: Vec<Vec<u8>>,
}

impl LineStore {
    pub fn fill(mut source: impl BufRead) -> Result<Self, ReverseError> {
        let mut lines: Vec<Vec<u8>> = Vec::new();
        let mut scratch = Vec::new();
        loop {
            scratch.clear();
            // Each line keeps its terminator; a final line without one is
            // stored as-is, no terminator added.
            if source.read_until(b'\n', &mut scratch)? == 0 {
                break;
            }
            let mut line = Vec::new();
            line.try_reserve_exact(scratch.len())?;
            line.extend_from_slice(&scratch);
            lines.try_reserve(1)?;
            lines.push(line);
        }
        Ok(Self { lines })
    }

    pub fn drain_reverse(self, sink: &mut impl Write) -> Result<(), ReverseError> {
        for line in self.lines.into_iter().rev() {
            sink.write_all(&line)?;
        }
        sink.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageIdentity {
    #[cfg(unix)]
    device: u64,
    #[cfg(unix)]
    inode: u64,
    #[cfg(not(unix))]
    canonical: PathBuf,
}

impl StorageIdentity {
    #[cfg(unix)]
    pub fn of(path: impl AsRef<Path>) -> io::Result<Self> {
        use std::os::unix::fs::MetadataExt;

        let meta = fs::metadata(path)?;
        Ok(Self {
            device: meta.dev(),
            inode: meta.ino(),
        })
    }

    // Canonical absolute path is an approximation of dev+ino on platforms
    // without inode semantics.
    #[cfg(not(unix))]
    pub fn of(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            canonical: fs::canonicalize(path)?,
        })
    }
}
