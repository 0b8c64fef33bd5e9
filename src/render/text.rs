//! Plain text listing: one `id: text` line per entry, CRLF terminated

use crate::tlk::StringRef;
use crate::{Result, NO_DATA_MARKER};
use std::io::Write;

/// Write every entry as `"{string_id}: {text}\r\n"`
pub fn write_text<W: Write>(refs: &[StringRef], mut writer: W) -> Result<()> {
    for string_ref in refs {
        write!(
            writer,
            "{}: {}\r\n",
            string_ref.string_id,
            string_ref.text().unwrap_or(NO_DATA_MARKER)
        )?;
    }
    writer.flush()?;
    Ok(())
}
