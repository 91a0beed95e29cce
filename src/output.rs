use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Streams values into a single JSON array: `[`, then each element with a
/// leading comma after the first, then `]` on [`finish`](Self::finish).
pub struct JsonArrayWriter<W: Write> {
    inner: W,
    count: usize,
}

impl JsonArrayWriter<BufWriter<File>> {
    /// Create (truncate) `path` and write the opening bracket.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("could not open file: {}", path.display()))?;
        Self::begin(BufWriter::new(file))
            .with_context(|| format!("could not write to {}", path.display()))
    }
}

impl<W: Write> JsonArrayWriter<W> {
    pub fn begin(mut inner: W) -> io::Result<Self> {
        inner.write_all(b"[")?;
        Ok(Self { inner, count: 0 })
    }

    pub fn push<T: Serialize + ?Sized>(&mut self, item: &T) -> io::Result<()> {
        if self.count > 0 {
            self.inner.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.inner, item)?;
        self.count += 1;
        Ok(())
    }

    /// Elements written so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Close the array and flush. Returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.write_all(b"]")?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}
