//! In-memory writer
//!
//! Keeps written files in a map keyed by path and logs every call so
//! tests can assert on ordering (write before notify, and so on).

use mailhost_config::{TargetFile, Writer};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One call made to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Write(PathBuf),
    Remove(PathBuf),
    Notify(PathBuf),
}

#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub files: BTreeMap<PathBuf, String>,
    pub ops: Vec<Op>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `path` already holding `contents`.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.insert(path.into(), contents.to_string());
        self
    }

    pub fn contents(&self, path: &str) -> Option<&str> {
        self.files.get(&PathBuf::from(path)).map(String::as_str)
    }
}

impl Writer for RecordingWriter {
    fn write(&mut self, target: &TargetFile, contents: &str) {
        self.ops.push(Op::Write(target.path.clone()));
        self.files.insert(target.path.clone(), contents.to_string());
    }

    fn remove(&mut self, target: &TargetFile) {
        self.ops.push(Op::Remove(target.path.clone()));
        self.files.remove(&target.path);
    }

    fn notify(&mut self, target: &TargetFile) {
        self.ops.push(Op::Notify(target.path.clone()));
    }
}
