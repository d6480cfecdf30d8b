//! Shared fixtures for integration tests.

#![allow(dead_code)]

use blobtext::{BytesFileRef, Field, FileRef, Record};
use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Record with a `fileInfo` name and an in-memory `fileRef`.
pub fn file_record(id: &str, name: &str, bytes: &[u8]) -> Record {
    record_with_ref(id, name, BytesFileRef::new(bytes.to_vec()))
}

pub fn record_with_ref(id: &str, name: &str, file_ref: impl FileRef + 'static) -> Record {
    Record::new(
        id,
        Field::map([
            ("fileInfo", Arc::new(Field::string(name))),
            ("fileRef", Arc::new(Field::file_ref(file_ref))),
        ]),
    )
}

pub fn content_of(record: &Record) -> &str {
    record
        .get("/content")
        .and_then(|field| field.as_str())
        .expect("output record should carry a string content field")
}

pub fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use zip::write::{FileOptions, ZipWriter};

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = FileOptions::<'_, ()>::default();
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }
    cursor.into_inner()
}

pub fn tar_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut tar = tar::Builder::new(&mut cursor);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_path(name).unwrap();
            header.set_size(data.len() as u64);
            header.set_cksum();
            tar.append(&header, *data).unwrap();
        }
        tar.finish().unwrap();
    }
    cursor.into_inner()
}

/// Stream that serves `prefix` and then fails with a connection reset.
#[derive(Debug)]
pub struct BrokenFileRef {
    pub prefix: Vec<u8>,
}

impl FileRef for BrokenFileRef {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.prefix.clone()).chain(BrokenReader)))
    }
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer"))
    }
}

/// Stream that never ends, serving one byte per `delay`.
#[derive(Debug)]
pub struct SlowFileRef {
    pub delay: Duration,
}

impl FileRef for SlowFileRef {
    fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(SlowReader { delay: self.delay }))
    }
}

struct SlowReader {
    delay: Duration,
}

impl Read for SlowReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        thread::sleep(self.delay);
        if buf.is_empty() {
            return Ok(0);
        }
        buf[0] = b'a';
        Ok(1)
    }
}

/// Single-font PDF with one text line per page.
pub fn pdf_of(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
