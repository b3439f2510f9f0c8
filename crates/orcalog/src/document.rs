use std::{fs::read_to_string, path::Path};

use crate::error::ParseError;

/// The lines of a single output file with leading and trailing whitespace
/// removed. ORCA indents almost everything, so normalizing once up front lets
/// every marker search compare against the bare text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogDocument {
    name: String,
    lines: Vec<String>,
}

impl LogDocument {
    /// build a document from the full `contents` of a file named `name`
    pub fn new(name: impl Into<String>, contents: &str) -> Self {
        Self {
            name: name.into(),
            lines: contents.lines().map(|l| l.trim().to_owned()).collect(),
        }
    }

    /// read the file at `path` into a document named after its file name
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let contents = read_to_string(path)
            .map_err(|e| ParseError::ReadFile(name.clone(), e.kind()))?;
        Ok(Self::new(name, &contents))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
