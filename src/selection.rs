use crate::models::{FileInfo, SelectedFile};
use std::fmt;

pub const MAX_FILES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    TooManyFiles { current: usize, adding: usize },
    NoSuchFile(usize),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::TooManyFiles { .. } => write!(f, "Maximum {MAX_FILES} files allowed"),
            SelectionError::NoSuchFile(index) => write!(f, "no selected file at position {index}"),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Ordered list of files waiting to be submitted. Never holds more than
/// [`MAX_FILES`] entries.
#[derive(Debug, Clone, Default)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
}

impl FileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a batch. A batch that would overflow the limit is rejected
    /// whole and the selection stays as it was.
    pub fn add(&mut self, batch: Vec<SelectedFile>) -> Result<usize, SelectionError> {
        if self.files.len() + batch.len() > MAX_FILES {
            return Err(SelectionError::TooManyFiles {
                current: self.files.len(),
                adding: batch.len(),
            });
        }
        self.files.extend(batch);
        Ok(self.files.len())
    }

    pub fn remove(&mut self, index: usize) -> Result<SelectedFile, SelectionError> {
        if index >= self.files.len() {
            return Err(SelectionError::NoSuchFile(index));
        }
        Ok(self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn describe(&self) -> Vec<FileInfo> {
        self.files
            .iter()
            .map(|file| FileInfo {
                name: file.name.clone(),
                size: file.size(),
            })
            .collect()
    }
}
