//! XML rendering
//!
//! Layout:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <tlkFile TLKToolVersion="1.0.4">
//!     <!--Male entries section begin (ends at position N)-->
//!     <string>
//!         <id>..</id>
//!         <position>..</position>
//!         <data>..</data>
//!     </string>
//!     <!--Male entries section end-->
//!     <!--Female entries section begin (ends at position M)-->
//!     ...
//!     <!--Female entries section end-->
//! </tlkFile>
//! ```
//!
//! Indentation is one tab per level.

use crate::tlk::{StringRef, TalkTableFile};
use crate::{Result, NO_DATA_MARKER, TLK_TOOL_VERSION};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Write `table` as an XML document
pub fn write_xml<W: Write>(table: &TalkTableFile, writer: W) -> Result<()> {
    write_xml_refs(table.string_refs(), table.male_end(), writer)
}

/// Write entries as an XML document, starting the second group at `male_end`
pub fn write_xml_refs<W: Write>(refs: &[StringRef], male_end: usize, writer: W) -> Result<()> {
    let total = refs.len();
    let mut xml = Writer::new_with_indent(writer, b'\t', 1);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    xml.write_event(Event::Start(
        BytesStart::new("tlkFile").with_attributes([("TLKToolVersion", TLK_TOOL_VERSION)]),
    ))?;
    write_comment(
        &mut xml,
        &format!(
            "Male entries section begin (ends at position {})",
            male_end as i64 - 1
        ),
    )?;

    let mut boundary_written = false;
    for string_ref in refs {
        if string_ref.position == male_end {
            write_group_boundary(&mut xml, total)?;
            boundary_written = true;
        }
        write_string(&mut xml, string_ref)?;
    }
    if !boundary_written {
        write_group_boundary(&mut xml, total)?;
    }

    write_comment(&mut xml, "Female entries section end")?;
    xml.write_event(Event::End(BytesEnd::new("tlkFile")))?;

    let writer = xml.get_mut();
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn write_group_boundary<W: Write>(xml: &mut Writer<W>, total: usize) -> Result<()> {
    write_comment(xml, "Male entries section end")?;
    write_comment(
        xml,
        &format!(
            "Female entries section begin (ends at position {})",
            total as i64 - 1
        ),
    )
}

fn write_comment<W: Write>(xml: &mut Writer<W>, text: &str) -> Result<()> {
    xml.write_event(Event::Comment(BytesText::new(text)))?;
    Ok(())
}

fn write_string<W: Write>(xml: &mut Writer<W>, string_ref: &StringRef) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new("string")))?;
    xml.create_element("id")
        .write_text_content(BytesText::new(&string_ref.string_id.to_string()))?;
    xml.create_element("position")
        .write_text_content(BytesText::new(&string_ref.position.to_string()))?;

    let data = xml.create_element("data");
    match string_ref.text() {
        Some("") => {
            data.write_empty()?;
        }
        Some(text) => {
            data.write_text_content(BytesText::new(text))?;
        }
        None => {
            data.write_text_content(BytesText::new(NO_DATA_MARKER))?;
        }
    }

    xml.write_event(Event::End(BytesEnd::new("string")))?;
    Ok(())
}
