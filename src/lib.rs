//! tlkdecode - Rust decoder for Huffman-compressed talk tables
//!
//! A talk table (TLK) is the string table format used by the PC build of
//! Mass Effect 2. Every string is Huffman coded and packed into one bit
//! stream; a table of `(string_id, bit_offset)` entries points into it.
//! This crate validates the header, rebuilds the Huffman tree, decodes the
//! bit stream and binds each entry to its text.
//!
//! # Features
//!
//! - Header validation with a distinct error for console (byte-swapped) tables
//! - One linear catalogue scan; entries pointing at catalogued strings are
//!   never decoded twice
//! - XML and plain text renderers
//! - Optional async batch loading (`async` feature)
//!
//! # Example
//!
//! ```no_run
//! use tlkdecode::{render, TalkTableFile};
//!
//! let table = TalkTableFile::open("BIOGame_INT.tlk")?;
//! for string_ref in table.string_refs() {
//!     println!("{}: {:?}", string_ref.string_id, string_ref.text());
//! }
//!
//! let xml = render::render_to_string(&table, render::OutputFormat::Xml)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod common;
pub mod error;
pub mod render;
pub mod stream;
pub mod tlk;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;
#[cfg(feature = "async")]
pub mod async_convenience;

// Re-export commonly used types
pub use common::{
    LoadOptions, LoadStats, Result, TlkError, UnterminatedPolicy, ENTRY_SIZE, HEADER_SIZE,
    NODE_SIZE, NO_DATA_MARKER, TLK_MAGIC, TLK_MAGIC_SWAPPED, TLK_TOOL_VERSION,
};
pub use render::OutputFormat;
pub use tlk::{StringRef, TalkTableFile, TalkTableHeader};

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::AsyncBatchProcessor;
#[cfg(feature = "async")]
pub use async_convenience::*;

// Convenience functions

/// Decode a talk table held in memory
///
/// # Arguments
/// * `data` - The complete file contents
///
/// # Returns
/// The resolved entries in file order
pub fn decode_bytes(data: &[u8]) -> Result<Vec<StringRef>> {
    tlk::decode_bytes(data)
}
