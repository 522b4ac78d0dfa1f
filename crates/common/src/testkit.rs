//! Builders for deposit packages used across the test suites.
//!
//! Everything here produces bytes in memory: a METS manifest with a chosen
//! set of DIM fields, and zip packages holding arbitrary entries.
//!
//! [`streamed_package`] lays entries out the way streaming zip writers do,
//! with sizes and checksums deferred to a data descriptor after each entry.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::manifest::MANIFEST_ENTRY_NAME;

/// A DIM field as `(schema, element, qualifier, value)`.
pub type DimField<'a> = (&'a str, &'a str, Option<&'a str>, &'a str);

/// Render a METS manifest carrying the given DIM fields.
pub fn mets_manifest(fields: &[DimField<'_>]) -> String {
    let mut body = String::new();
    for (schema, element, qualifier, value) in fields {
        let qualifier = qualifier
            .map(|q| format!(r#" qualifier="{}""#, q))
            .unwrap_or_default();
        body.push_str(&format!(
            r#"            <dim:field mdschema="{}" element="{}"{}>{}</dim:field>
"#,
            schema, element, qualifier, value
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mets:mets xmlns:mets="http://www.loc.gov/METS/" xmlns:dim="http://www.dspace.org/xmlns/dspace/dim" PROFILE="DSpace METS SIP Profile 1.0">
  <mets:dmdSec ID="dmd_1">
    <mets:mdWrap MDTYPE="OTHER" OTHERMDTYPE="DIM">
      <mets:xmlData>
        <dim:dim>
{}        </dim:dim>
      </mets:xmlData>
    </mets:mdWrap>
  </mets:dmdSec>
  <mets:fileSec>
    <mets:fileGrp USE="CONTENT">
      <mets:file ID="file_1" MIMETYPE="application/pdf">
        <mets:FLocat LOCTYPE="URL" xlink:href="thesis.pdf" xmlns:xlink="http://www.w3.org/1999/xlink"/>
      </mets:file>
    </mets:fileGrp>
  </mets:fileSec>
</mets:mets>
"#,
        body
    )
}

/// Zip the given `(name, contents)` entries, deflated.
pub fn zip_package(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, contents) in entries {
        writer
            .start_file(*name, options)
            .expect("zip entry should start");
        writer.write_all(contents).expect("zip entry should write");
    }

    writer
        .finish()
        .expect("zip archive should finish")
        .into_inner()
}

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;
const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x0807_4b50;
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4b50;
const DATA_DESCRIPTOR_FLAG: u16 = 1 << 3;
// 1980-01-01 in MS-DOS date format
const DOS_EPOCH_DATE: u16 = 0x0021;

/// Zip the given entries stored, with sizes and checksums only in trailing
/// data descriptors and the central directory.
pub fn streamed_package(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for (name, contents) in entries {
        let offset = out.len() as u32;
        let crc = crc32(contents);
        let size = contents.len() as u32;

        put_u32(&mut out, LOCAL_HEADER_SIGNATURE);
        put_u16(&mut out, 20);
        put_u16(&mut out, DATA_DESCRIPTOR_FLAG);
        put_u16(&mut out, 0);
        put_u16(&mut out, 0);
        put_u16(&mut out, DOS_EPOCH_DATE);
        put_u32(&mut out, 0);
        put_u32(&mut out, 0);
        put_u32(&mut out, 0);
        put_u16(&mut out, name.len() as u16);
        put_u16(&mut out, 0);
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(contents);

        put_u32(&mut out, DATA_DESCRIPTOR_SIGNATURE);
        put_u32(&mut out, crc);
        put_u32(&mut out, size);
        put_u32(&mut out, size);

        put_u32(&mut central, CENTRAL_HEADER_SIGNATURE);
        put_u16(&mut central, 20);
        put_u16(&mut central, 20);
        put_u16(&mut central, DATA_DESCRIPTOR_FLAG);
        put_u16(&mut central, 0);
        put_u16(&mut central, 0);
        put_u16(&mut central, DOS_EPOCH_DATE);
        put_u32(&mut central, crc);
        put_u32(&mut central, size);
        put_u32(&mut central, size);
        put_u16(&mut central, name.len() as u16);
        put_u16(&mut central, 0);
        put_u16(&mut central, 0);
        put_u16(&mut central, 0);
        put_u16(&mut central, 0);
        put_u32(&mut central, 0);
        put_u32(&mut central, offset);
        central.extend_from_slice(name.as_bytes());
    }

    let central_offset = out.len() as u32;
    out.extend_from_slice(&central);

    put_u32(&mut out, END_OF_CENTRAL_DIRECTORY_SIGNATURE);
    put_u16(&mut out, 0);
    put_u16(&mut out, 0);
    put_u16(&mut out, entries.len() as u16);
    put_u16(&mut out, entries.len() as u16);
    put_u32(&mut out, central.len() as u32);
    put_u32(&mut out, central_offset);
    put_u16(&mut out, 0);

    out
}

/// A single stored `mets.xml` local header whose zip64 extra field declares
/// an uncompressed size of `declared_size` bytes. No data follows it.
pub fn oversized_manifest_header(declared_size: u64) -> Vec<u8> {
    let mut out = Vec::new();
    put_u32(&mut out, LOCAL_HEADER_SIGNATURE);
    put_u16(&mut out, 45);
    put_u16(&mut out, 0);
    put_u16(&mut out, 0);
    put_u16(&mut out, 0);
    put_u16(&mut out, DOS_EPOCH_DATE);
    put_u32(&mut out, 0);
    put_u32(&mut out, 0);
    put_u32(&mut out, u32::MAX);
    put_u16(&mut out, MANIFEST_ENTRY_NAME.len() as u16);
    put_u16(&mut out, 12);
    out.extend_from_slice(MANIFEST_ENTRY_NAME.as_bytes());
    // zip64 extended information
    put_u16(&mut out, 0x0001);
    put_u16(&mut out, 8);
    out.extend_from_slice(&declared_size.to_le_bytes());
    out
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = u32::MAX;
    for byte in bytes {
        crc ^= u32::from(*byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// A package with a content file and a manifest titled `title`.
pub fn valid_package(title: &str) -> Vec<u8> {
    let manifest = mets_manifest(&[
        ("dc", "title", None, title),
        ("dc", "contributor", Some("author"), "Phillips, Scott"),
    ]);
    zip_package(&[
        ("thesis.pdf", b"%PDF-1.4 not really a pdf"),
        (MANIFEST_ENTRY_NAME, manifest.as_bytes()),
    ])
}

/// A package whose manifest has no `dc.title` field.
pub fn untitled_package() -> Vec<u8> {
    let manifest = mets_manifest(&[("dc", "contributor", Some("author"), "Maslov, Alexey")]);
    zip_package(&[
        ("thesis.pdf", b"%PDF-1.4 not really a pdf"),
        (MANIFEST_ENTRY_NAME, manifest.as_bytes()),
    ])
}

/// A package with content but no manifest.
pub fn unmanifested_package() -> Vec<u8> {
    zip_package(&[
        ("thesis.pdf", b"%PDF-1.4 not really a pdf"),
        ("README.txt", b"no manifest here"),
    ])
}

/// [`valid_package`] laid out with data descriptors.
pub fn streamed_valid_package(title: &str) -> Vec<u8> {
    let manifest = mets_manifest(&[("dc", "title", None, title)]);
    streamed_package(&[
        ("thesis.pdf", b"%PDF-1.4 not really a pdf"),
        (MANIFEST_ENTRY_NAME, manifest.as_bytes()),
    ])
}
