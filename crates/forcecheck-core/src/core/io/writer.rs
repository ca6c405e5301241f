use serde_yaml::{Mapping, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),
}

/// Builds a single-level mapping document and serializes it.
///
/// Keys keep the order in which they were emitted. Singletons are written as
/// plain scalars (quoted only where YAML requires it) and multi-line blocks
/// as literal scalars.
#[derive(Debug, Clone, Default)]
pub struct DocumentWriter {
    entries: Mapping,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_str(&mut self, key: &str, value: &str) {
        self.insert(key, Value::String(value.to_string()));
    }

    pub fn emit_real(&mut self, key: &str, value: f64) {
        self.insert(key, Value::Number(value.into()));
    }

    pub fn emit_int(&mut self, key: &str, value: u64) {
        self.insert(key, Value::Number(value.into()));
    }

    /// Emits one line per item, each terminated by a newline.
    pub fn emit_block<I, S>(&mut self, key: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut block = String::new();
        for line in lines {
            block.push_str(line.as_ref());
            block.push('\n');
        }
        self.insert(key, Value::String(block));
    }

    fn insert(&mut self, key: &str, value: Value) {
        self.entries.insert(Value::String(key.to_string()), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), WriteError> {
        writeln!(writer, "---")?;
        if !self.entries.is_empty() {
            serde_yaml::to_writer(&mut *writer, &self.entries)?;
        }
        writeln!(writer, "...")?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| WriteError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
    }

    pub fn to_text(&self) -> Result<String, WriteError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            WriteError::Stream(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}
