//! Module containing the Error enum for errors that can occur in this crate.


use std::io;
use std::path::PathBuf;

use thiserror::Error as ThisError;


/// Error enum for errors that can occur in this crate.
///
/// Malformed programs never produce an error: bad tokens degrade to no-ops and
/// the tape grows on demand. Only the sources around the interpreter can fail.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The program file could not be opened or read.
    #[error("Program file '{}' could not be read: {source}", path.display())]
    ProgramUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The input file could not be opened.
    #[error("Input file '{}' could not be read: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The output file could not be created.
    #[error("Output file '{}' could not be created: {source}", path.display())]
    OutputUncreatable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading the program or input, or writing the output failed mid-run.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
