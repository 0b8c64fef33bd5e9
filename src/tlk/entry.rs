//! Entry records and their resolution to decoded strings

use super::decoder::{DecodeStrings, StringCatalogue};
use crate::stream::ByteStream;
use crate::{LoadStats, Result, TlkError, UnterminatedPolicy};

/// Raw entry record as stored after the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRecord {
    /// String identifier
    pub string_id: i32,
    /// Bit offset of the string in the blob, negative when there is none
    pub bit_offset: i32,
}

impl EntryRecord {
    /// Read one 8-byte record
    pub fn read(stream: &mut ByteStream<'_>) -> Result<Self> {
        let (string_id, bit_offset) = stream.read_i32_pair()?;
        Ok(Self {
            string_id,
            bit_offset,
        })
    }
}

/// An entry bound to its decoded text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRef {
    /// String identifier
    pub string_id: i32,
    /// Bit offset the text was taken from (negative = no string)
    pub bit_offset: i32,
    /// Index among all entries, first group followed by second group
    pub position: usize,
    /// Decoded text, `None` for entries without a string
    pub text: Option<String>,
}

impl StringRef {
    /// Text, or `None` when the entry has no data
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether the entry has no string
    pub fn is_empty_entry(&self) -> bool {
        self.bit_offset < 0
    }
}

/// Bind every entry to its text, in entry order
///
/// Offsets found in the catalogue reuse the cached text. Offsets that are
/// not a catalogued boundary go through [`resolve_uncatalogued`]. `policy`
/// applies to every entry whose text has no terminator, cached or not.
pub fn resolve_entries<D>(
    decoder: &D,
    catalogue: &StringCatalogue,
    records: &[EntryRecord],
    policy: UnterminatedPolicy,
    stats: &mut LoadStats,
) -> Result<Vec<StringRef>>
where
    D: DecodeStrings + ?Sized,
{
    let mut refs = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let text = if record.bit_offset < 0 {
            stats.empty_entries += 1;
            None
        } else {
            let offset = record.bit_offset as usize;
            match catalogue.get(offset) {
                Some(cached) => {
                    stats.cache_hits += 1;
                    if !cached.terminated && policy == UnterminatedPolicy::Reject {
                        return Err(TlkError::UnterminatedString { offset });
                    }
                    Some(cached.text.clone())
                }
                None => {
                    stats.fallback_decodes += 1;
                    Some(resolve_uncatalogued(decoder, offset, policy)?)
                }
            }
        };

        refs.push(StringRef {
            string_id: record.string_id,
            bit_offset: record.bit_offset,
            position,
            text,
        });
    }

    Ok(refs)
}

/// Decode an entry whose offset is not a catalogued string boundary
///
/// Such offsets point inside a longer string whose tail the table shares.
/// No substring lookup is attempted: the text is decoded directly from the
/// offset, which is only exact where the code resynchronises there.
pub fn resolve_uncatalogued<D>(
    decoder: &D,
    offset: usize,
    policy: UnterminatedPolicy,
) -> Result<String>
where
    D: DecodeStrings + ?Sized,
{
    log::trace!("Offset {} not catalogued, decoding independently", offset);
    decoder.decode_from(offset)?.into_text(offset, policy)
}
