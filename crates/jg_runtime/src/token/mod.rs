//! The streaming token model consumed and produced by generated codecs.

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod token;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::{TokenCursor, TokenReader};
pub use token::{Location, Token, TokenKind, value_extent};
pub use writer::{TokenBuffer, TokenWriter};
