use std::error::Error as StdError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Failure while writing a job file.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A text input format parsed into a document.
pub trait ConfigFile {
    /// The parsed representation of the file.
    type Document;

    /// The error type for read operations.
    type Error: StdError + From<io::Error>;

    /// Parses a document from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if a line is malformed or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Document, Self::Error>;

    /// Parses a document from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Document, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// A job-control text file rendered from already validated data.
///
/// Implementors borrow the data they render, so writing never re-derives or re-checks
/// anything.
pub trait JobFile {
    /// The error type for write operations.
    type Error: StdError + From<io::Error>;

    /// Renders the file into a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(&self, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Renders the file into a newly created file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Renders the file into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&self) -> Result<String, Self::Error> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
