//! Errors raised by diagram edits.

use thiserror::Error;

/// A lookup that named something the diagram does not hold.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagramError {
	/// No shape carries the given id.
	#[error("no shape with id `{0}`")]
	UnknownShape(String),
	/// No connection carries the given id.
	#[error("no connection with id `{0}`")]
	UnknownConnection(String),
}

/// Result of a diagram edit.
pub type Result<T> = std::result::Result<T, DiagramError>;
