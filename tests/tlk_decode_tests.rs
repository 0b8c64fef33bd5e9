//! End-to-end decoding tests
//!
//! Talk table images are assembled in memory with a small test encoder and
//! decoded through the public API.

mod common;

use common::{build_tlk, build_tlk_with_magic, pack_bits, TestCodec};
use tlkdecode::render::{render_to_string, OutputFormat};
use tlkdecode::tlk::{leaf_sentinel, TalkTableFile};
use tlkdecode::{decode_bytes, LoadOptions, TlkError, TLK_MAGIC_SWAPPED};

/// Single entry, one node `{ 'A', terminator }`, blob `0b0100_0000`
const SINGLE_ENTRY_TLK: &str = concat!(
    "546c6b00", "00000000", "00000000", // magic, version, min_version
    "01000000", "00000000", // entry1_count, entry2_count
    "01000000", "01000000", // tree_node_count, data_length
    "2a000000", "00000000", // entry: id 42, bit offset 0
    "beffffff", "ffffffff", // node 0: leaf 'A', leaf 0
    "40",       // blob
);

#[test]
fn test_single_entry_fixture() -> Result<(), Box<dyn std::error::Error>> {
    let data = hex::decode(SINGLE_ENTRY_TLK)?;
    let refs = decode_bytes(&data)?;

    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].string_id, 42);
    assert_eq!(refs[0].position, 0);
    assert_eq!(refs[0].text(), Some("A"));
    Ok(())
}

#[test]
fn test_strict_load_ignores_trailing_padding() -> Result<(), Box<dyn std::error::Error>> {
    // The six padding bits after "A" decode to an unterminated tail no entry uses
    let data = hex::decode(SINGLE_ENTRY_TLK)?;
    let table = TalkTableFile::from_bytes_with_options(&data, &LoadOptions::strict())?;

    assert_eq!(table.string_refs().len(), 1);
    assert_eq!(table.string_refs()[0].string_id, 42);
    assert_eq!(table.string_refs()[0].text(), Some("A"));
    assert_eq!(table.stats().unterminated_strings, 1);
    Ok(())
}

#[test]
fn test_swapped_magic_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut data = hex::decode(SINGLE_ENTRY_TLK)?;
    data[..4].copy_from_slice(&TLK_MAGIC_SWAPPED.to_le_bytes());

    match decode_bytes(&data) {
        Err(TlkError::WrongPlatformFormat { magic }) => assert_eq!(magic, TLK_MAGIC_SWAPPED),
        other => panic!("expected WrongPlatformFormat, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_big_endian_file_rejected_as_wrong_platform() {
    // A console table stores the same bytes in reverse order per field
    let data = build_tlk_with_magic(TLK_MAGIC_SWAPPED, &[], &[], &[], &[]);
    assert!(matches!(
        TalkTableFile::from_bytes(&data),
        Err(TlkError::WrongPlatformFormat { .. })
    ));
}

#[test]
fn test_foreign_file_rejected() {
    let data = b"RIFF\x24\x00\x00\x00WAVEfmt \x10\x00\x00\x00\x01\x00\x02\x00\x44\xac\x00\x00";
    assert!(matches!(
        decode_bytes(data),
        Err(TlkError::NotThisFormat { .. })
    ));
}

#[test]
fn test_empty_input() {
    assert!(matches!(
        decode_bytes(&[]),
        Err(TlkError::TruncatedStream { .. })
    ));
}

#[test]
fn test_every_truncation_fails_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let data = hex::decode(SINGLE_ENTRY_TLK)?;
    for len in 4..data.len() {
        match decode_bytes(&data[..len]) {
            Err(TlkError::TruncatedStream { .. }) => {}
            other => panic!("length {len}: expected TruncatedStream, got {other:?}"),
        }
    }
    Ok(())
}

#[test]
fn test_dialogue_table() {
    let male = ["Shepard", "I should go.", "We'll bang, okay?"];
    let female = ["Shepard", "Commander"];
    let all: Vec<&str> = male.iter().chain(female.iter()).copied().collect();

    let codec = TestCodec::for_strings(&all);
    let (blob, offsets) = codec.encode(&all);
    let entries: Vec<(i32, i32)> = offsets
        .iter()
        .enumerate()
        .map(|(i, &offset)| (1000 + i as i32, offset))
        .collect();

    let data = build_tlk(&entries[..3], &entries[3..], &codec.nodes, &blob);
    let table = TalkTableFile::from_bytes(&data).unwrap();

    let texts: Vec<&str> = table
        .string_refs()
        .iter()
        .map(|r| r.text().unwrap())
        .collect();
    assert_eq!(texts, all);
    assert_eq!(table.male_end(), 3);
    assert_eq!(table.female_end(), 5);
    assert_eq!(table.female_refs()[0].position, 3);
    assert_eq!(table.stats().cache_hits, 5);
    assert_eq!(table.stats().fallback_decodes, 0);
}

#[test]
fn test_shared_offsets_and_missing_strings() {
    let strings = ["Yes", "No"];
    let codec = TestCodec::for_strings(&strings);
    let (blob, offsets) = codec.encode(&strings);

    let male = [(1, offsets[0]), (2, -1), (3, offsets[1])];
    let female = [(4, offsets[0]), (5, -1)];
    let data = build_tlk(&male, &female, &codec.nodes, &blob);
    let table = TalkTableFile::from_bytes(&data).unwrap();

    let texts: Vec<Option<&str>> = table.string_refs().iter().map(|r| r.text()).collect();
    assert_eq!(
        texts,
        vec![Some("Yes"), None, Some("No"), Some("Yes"), None]
    );
    assert_eq!(table.stats().empty_entries, 2);
    assert_eq!(table.stats().cache_hits, 3);
}

#[test]
fn test_offset_inside_string_uses_fallback() {
    let strings = ["Hello"];
    let codec = TestCodec::for_strings(&strings);
    let (blob, offsets) = codec.encode(&strings);

    // Point a second entry at the "llo" tail of "Hello"
    let tail = offsets[0] + (codec.code(b'H').len() + codec.code(b'e').len()) as i32;
    let data = build_tlk(&[(1, offsets[0]), (2, tail)], &[], &codec.nodes, &blob);
    let table = TalkTableFile::from_bytes(&data).unwrap();

    assert_eq!(table.find(1).and_then(|r| r.text()), Some("Hello"));
    assert_eq!(table.find(2).and_then(|r| r.text()), Some("llo"));
    assert_eq!(table.stats().fallback_decodes, 1);
}

#[test]
fn test_unterminated_string_policies() {
    // Node 0: 'A' / terminator. Bits 0 1 then six 'A' codes with no terminator.
    let nodes = [(leaf_sentinel(b'A'), leaf_sentinel(0))];
    let data = build_tlk(&[(1, 0), (2, 2)], &[], &nodes, &[0b0100_0000]);

    let table = TalkTableFile::from_bytes(&data).unwrap();
    assert_eq!(table.find(2).and_then(|r| r.text()), Some("AAAAAA"));
    assert_eq!(table.stats().unterminated_strings, 1);

    let err = TalkTableFile::from_bytes_with_options(&data, &LoadOptions::strict()).unwrap_err();
    assert!(matches!(err, TlkError::UnterminatedString { offset: 2 }));
}

#[test]
fn test_offset_beyond_blob_is_empty_text() {
    let nodes = [(leaf_sentinel(b'A'), leaf_sentinel(0))];
    let data = build_tlk(&[(1, 1000)], &[], &nodes, &[0b0100_0000]);

    let table = TalkTableFile::from_bytes(&data).unwrap();
    assert_eq!(table.string_refs()[0].text(), Some(""));
    assert_eq!(table.stats().fallback_decodes, 1);
}

#[test]
fn test_bad_tree_index() {
    let nodes = [(5, leaf_sentinel(0))];
    let data = build_tlk(&[(1, 0)], &[], &nodes, &[0x00]);
    match TalkTableFile::from_bytes(&data) {
        Err(TlkError::TreeIndexOutOfRange { index, len }) => {
            assert_eq!(index, 5);
            assert_eq!(len, 1);
        }
        other => panic!("expected TreeIndexOutOfRange, got {other:?}"),
    }
}

#[test]
fn test_bad_leaf_value() {
    let nodes = [(i32::MIN, leaf_sentinel(0))];
    let data = build_tlk(&[(1, 0)], &[], &nodes, &[0x00]);
    assert!(matches!(
        TalkTableFile::from_bytes(&data),
        Err(TlkError::InvalidLeafValue { value: i32::MIN })
    ));
}

#[test]
fn test_empty_table() {
    let data = build_tlk(&[], &[], &[], &[]);
    let table = TalkTableFile::from_bytes(&data).unwrap();
    assert!(table.string_refs().is_empty());
    assert_eq!(table.stats().catalogue_strings, 0);
}

#[test]
fn test_from_reader_and_open() -> Result<(), Box<dyn std::error::Error>> {
    let data = hex::decode(SINGLE_ENTRY_TLK)?;

    let table = TalkTableFile::from_reader(std::io::Cursor::new(&data))?;
    assert_eq!(table.string_refs()[0].text(), Some("A"));

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("single.tlk");
    std::fs::write(&path, &data)?;
    let table = TalkTableFile::open(&path)?;
    assert_eq!(table.header().tree_node_count, 1);

    assert!(matches!(
        TalkTableFile::open(dir.path().join("missing.tlk")),
        Err(TlkError::Io(_))
    ));
    Ok(())
}

#[test]
fn test_rendered_outputs() {
    let strings = ["Fish & <Chips>"];
    let codec = TestCodec::for_strings(&strings);
    let (blob, offsets) = codec.encode(&strings);
    let data = build_tlk(&[(7, offsets[0])], &[(8, -1)], &codec.nodes, &blob);
    let table = TalkTableFile::from_bytes(&data).unwrap();

    let text = render_to_string(&table, OutputFormat::Text).unwrap();
    assert_eq!(text, "7: Fish & <Chips>\r\n8: -1\r\n");

    let xml = render_to_string(&table, OutputFormat::Xml).unwrap();
    assert!(xml.contains("<data>Fish &amp; &lt;Chips&gt;</data>"));
    assert!(xml.contains("<!--Male entries section begin (ends at position 0)-->"));
    assert!(xml.contains("<!--Female entries section begin (ends at position 1)-->"));
    let boundary = xml.find("Male entries section end").unwrap();
    assert!(boundary < xml.find("<id>8</id>").unwrap());
    assert!(boundary > xml.find("<id>7</id>").unwrap());
}

#[test]
fn test_pack_bits_helper() {
    assert_eq!(pack_bits(&[false, true]), vec![0b0100_0000]);
    assert_eq!(
        pack_bits(&[true, false, false, false, false, false, false, true, true]),
        vec![0b1000_0001, 0b1000_0000]
    );
}
