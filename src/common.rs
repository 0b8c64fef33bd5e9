//! Common types and constants for the TLK talk table format
//!
//! This module defines the error type, format constants and load options
//! shared by the binary parser, the Huffman decoder and the renderers.

use thiserror::Error;

/// Magic number of a PC talk table (`"Tlk\0"` read as a little-endian i32)
pub const TLK_MAGIC: i32 = 7040084; // 0x006B6C54

/// Magic number of the same table layout stored with the other byte order
/// (console build). Recognised only so it can be rejected with its own error.
pub const TLK_MAGIC_SWAPPED: i32 = 1416391424; // 0x546C6B00

/// Size of the fixed header in bytes (seven i32 fields)
pub const HEADER_SIZE: usize = 7 * 4;

/// Size of one entry record (`string_id`, `bit_offset`)
pub const ENTRY_SIZE: usize = 8;

/// Size of one Huffman tree node (`left`, `right`)
pub const NODE_SIZE: usize = 8;

/// Marker written by the renderers for entries without a string
pub const NO_DATA_MARKER: &str = "-1";

/// Tool version advertised in the XML output root element
pub const TLK_TOOL_VERSION: &str = "1.0.4";

/// Error type for talk table operations
#[derive(Debug, Error)]
pub enum TlkError {
    /// The header carries the magic of the same format for another platform
    #[error("Talk table is stored for another platform (magic {magic:#010X}, byte order swapped)")]
    WrongPlatformFormat {
        /// Magic value read from the header
        magic: i32,
    },

    /// The header magic does not identify a talk table at all
    #[error("Not a talk table file (magic {magic:#010X}, expected 0x006B6C54)")]
    NotThisFormat {
        /// Magic value read from the header
        magic: i32,
    },

    /// A read or seek ran past the available bytes
    #[error(
        "Truncated stream: {requested} bytes requested at position {position}, {available} available"
    )]
    TruncatedStream {
        /// Byte position of the failed read or seek target
        position: usize,
        /// Number of bytes requested
        requested: usize,
        /// Number of bytes actually available from `position`
        available: usize,
    },

    /// A Huffman leaf sentinel cannot be converted to a byte
    #[error("Invalid Huffman leaf value: {value}")]
    InvalidLeafValue {
        /// Raw sentinel stored in the tree node
        value: i32,
    },

    /// An interior branch points outside the node array
    #[error("Huffman tree index {index} out of range (tree has {len} nodes)")]
    TreeIndexOutOfRange {
        /// Child index referenced by the branch
        index: usize,
        /// Number of nodes in the tree
        len: usize,
    },

    /// A header count or length field is negative
    #[error("Invalid header field {field}: {value}")]
    InvalidHeaderField {
        /// Name of the offending header field
        field: &'static str,
        /// Value read from the file
        value: i32,
    },

    /// The blob ended before a string terminator (strict mode only)
    #[error("Unterminated string starting at bit offset {offset}")]
    UnterminatedString {
        /// Bit offset the string started at
        offset: usize,
    },

    /// Two inputs of a batch conversion would write the same output file
    #[error("Output file {} would be written by more than one input", path.display())]
    DuplicateOutput {
        /// Output path claimed by several inputs
        path: std::path::PathBuf,
    },

    /// XML serialization error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for talk table operations
pub type Result<T> = std::result::Result<T, TlkError>;

/// What to do with a string that runs off the end of the compressed blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnterminatedPolicy {
    /// Keep the text decoded so far (compatible with existing tooling)
    #[default]
    ReturnPartial,
    /// Fail the load with [`TlkError::UnterminatedString`]
    Reject,
}

/// Options controlling how a talk table is loaded
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Handling of strings without a terminator at the end of the blob
    pub unterminated: UnterminatedPolicy,
}

impl LoadOptions {
    /// Create options with the compatible defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unterminated string policy
    pub fn with_unterminated(mut self, policy: UnterminatedPolicy) -> Self {
        self.unterminated = policy;
        self
    }

    /// Shorthand for rejecting unterminated strings
    pub fn strict() -> Self {
        Self::new().with_unterminated(UnterminatedPolicy::Reject)
    }
}

/// Statistics gathered while loading a talk table
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    /// Strings found by the catalogue scan
    pub catalogue_strings: usize,
    /// Entries resolved from the catalogue without decoding
    pub cache_hits: usize,
    /// Entries decoded independently because their offset was not catalogued
    pub fallback_decodes: usize,
    /// Entries without a string (negative bit offset)
    pub empty_entries: usize,
    /// Strings that ran off the end of the blob without a terminator
    pub unterminated_strings: usize,
}
