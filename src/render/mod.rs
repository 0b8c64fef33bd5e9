//! Output renderers for decoded talk tables
//!
//! Two formats are supported: an XML document with one `<string>` element
//! per entry, and a plain `id: text` listing.

pub mod text;
pub mod xml;

use crate::tlk::TalkTableFile;
use crate::Result;
use std::io::Write;

pub use text::write_text;
pub use xml::write_xml;

/// Output format for a decoded table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// XML document
    Xml,
    /// `id: text` lines
    Text,
}

impl OutputFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Text => "txt",
        }
    }
}

/// Render `table` in the given format
pub fn write_table<W: Write>(table: &TalkTableFile, format: OutputFormat, writer: W) -> Result<()> {
    match format {
        OutputFormat::Xml => write_xml(table, writer),
        OutputFormat::Text => write_text(table.string_refs(), writer),
    }
}

/// Render `table` into an in-memory string
pub fn render_to_string(table: &TalkTableFile, format: OutputFormat) -> Result<String> {
    let mut out = Vec::new();
    write_table(table, format, &mut out)?;
    // Both renderers only emit text built from `char`s
    Ok(String::from_utf8_lossy(&out).into_owned())
}
