//! Rendering of SWORD 1.3 documents: the AtomPub service document, the Atom
//! entry returned for a deposit, and `sword:error` documents.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use common::catalogue::{Collection, ServiceCatalogue, Workspace};
use common::error::ProtocolError;
use common::receipt::{DepositAcknowledgment, Generator};

pub const APP_NAMESPACE: &str = "http://www.w3.org/2007/app";
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";
pub const SWORD_NAMESPACE: &str = "http://purl.org/net/sword/";
pub const DCTERMS_NAMESPACE: &str = "http://purl.org/dc/terms/";

pub const SERVICE_DOCUMENT_CONTENT_TYPE: &str = "application/atomsvc+xml";
pub const ENTRY_CONTENT_TYPE: &str = "application/atom+xml; type=entry";

/// Treatment reported on error documents.
const ERROR_TREATMENT: &str = "processing failed";

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("failed to write xml: {0}")]
    Write(#[from] quick_xml::Error),
    #[error("failed to write xml: {0}")]
    Io(#[from] std::io::Error),
    #[error("rendered xml was not utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn new_document() -> Result<XmlWriter, XmlError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    Ok(writer)
}

fn finish(writer: XmlWriter) -> Result<String, XmlError> {
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<(), XmlError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn bool_element(writer: &mut XmlWriter, name: &str, value: bool) -> Result<(), XmlError> {
    text_element(writer, name, if value { "true" } else { "false" })
}

fn generator(writer: &mut XmlWriter, generator: &Generator) -> Result<(), XmlError> {
    let start = BytesStart::new("generator").with_attributes([
        ("uri", generator.uri.as_str()),
        ("version", generator.version.as_str()),
    ]);
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(&generator.name)))?;
    writer.write_event(Event::End(BytesEnd::new("generator")))?;
    Ok(())
}

fn collection(writer: &mut XmlWriter, collection: &Collection) -> Result<(), XmlError> {
    let start = BytesStart::new("collection").with_attributes([("href", collection.location.as_str())]);
    writer.write_event(Event::Start(start))?;

    text_element(writer, "atom:title", &collection.title)?;
    for media_type in &collection.accepted_media_types {
        text_element(writer, "accept", media_type)?;
    }
    for packaging in &collection.accepted_packaging {
        let q = format!("{:.1}", packaging.priority);
        let start = BytesStart::new("sword:acceptPackaging").with_attributes([("q", q.as_str())]);
        writer.write_event(Event::Start(start))?;
        writer.write_event(Event::Text(BytesText::new(&packaging.format)))?;
        writer.write_event(Event::End(BytesEnd::new("sword:acceptPackaging")))?;
    }
    text_element(writer, "sword:collectionPolicy", &collection.policy)?;
    text_element(writer, "dcterms:abstract", &collection.abstract_text)?;
    bool_element(writer, "sword:mediation", collection.mediation_allowed)?;

    writer.write_event(Event::End(BytesEnd::new("collection")))?;
    Ok(())
}

fn workspace(writer: &mut XmlWriter, workspace: &Workspace) -> Result<(), XmlError> {
    writer.write_event(Event::Start(BytesStart::new("workspace")))?;
    text_element(writer, "atom:title", &workspace.title)?;
    for c in &workspace.collections {
        collection(writer, c)?;
    }
    writer.write_event(Event::End(BytesEnd::new("workspace")))?;
    Ok(())
}

pub fn service_document(catalogue: &ServiceCatalogue) -> Result<String, XmlError> {
    let mut writer = new_document()?;

    let root = BytesStart::new("service").with_attributes([
        ("xmlns", APP_NAMESPACE),
        ("xmlns:atom", ATOM_NAMESPACE),
        ("xmlns:sword", SWORD_NAMESPACE),
        ("xmlns:dcterms", DCTERMS_NAMESPACE),
    ]);
    writer.write_event(Event::Start(root))?;

    text_element(&mut writer, "sword:version", &catalogue.protocol_version)?;
    bool_element(&mut writer, "sword:verbose", catalogue.supports_verbose)?;
    bool_element(&mut writer, "sword:noOp", catalogue.supports_no_op)?;
    bool_element(&mut writer, "sword:mediation", catalogue.supports_mediation)?;
    for w in &catalogue.workspaces {
        workspace(&mut writer, w)?;
    }

    writer.write_event(Event::End(BytesEnd::new("service")))?;
    finish(writer)
}

pub fn entry_document(ack: &DepositAcknowledgment) -> Result<String, XmlError> {
    let mut writer = new_document()?;

    let root = BytesStart::new("entry").with_attributes([
        ("xmlns", ATOM_NAMESPACE),
        ("xmlns:sword", SWORD_NAMESPACE),
    ]);
    writer.write_event(Event::Start(root))?;

    text_element(&mut writer, "title", &ack.title)?;
    text_element(&mut writer, "id", &ack.id)?;
    text_element(&mut writer, "updated", &ack.updated)?;

    writer.write_event(Event::Start(BytesStart::new("author")))?;
    text_element(&mut writer, "name", &ack.author.name)?;
    writer.write_event(Event::End(BytesEnd::new("author")))?;

    if let Some(contributor) = &ack.contributor {
        writer.write_event(Event::Start(BytesStart::new("contributor")))?;
        text_element(&mut writer, "name", &contributor.name)?;
        text_element(&mut writer, "email", &contributor.email)?;
        writer.write_event(Event::End(BytesEnd::new("contributor")))?;
    }

    let summary = BytesStart::new("summary").with_attributes([("type", "text")]);
    writer.write_event(Event::Start(summary))?;
    writer.write_event(Event::Text(BytesText::new(&ack.summary)))?;
    writer.write_event(Event::End(BytesEnd::new("summary")))?;

    let category = BytesStart::new("category").with_attributes([("term", ack.category.as_str())]);
    writer.write_event(Event::Empty(category))?;

    generator(&mut writer, &ack.generator)?;

    let content = BytesStart::new("content").with_attributes([
        ("type", ack.content_type.as_str()),
        ("src", ack.content_source.as_str()),
    ]);
    writer.write_event(Event::Empty(content))?;

    text_element(&mut writer, "sword:treatment", &ack.treatment)?;
    if let Some(description) = &ack.verbose_description {
        text_element(&mut writer, "sword:verboseDescription", description)?;
    }
    bool_element(&mut writer, "sword:noOp", ack.no_op)?;

    writer.write_event(Event::End(BytesEnd::new("entry")))?;
    finish(writer)
}

pub fn error_document(error: &ProtocolError, updated: &str) -> Result<String, XmlError> {
    let mut writer = new_document()?;

    let mut root = BytesStart::new("sword:error").with_attributes([
        ("xmlns", ATOM_NAMESPACE),
        ("xmlns:sword", SWORD_NAMESPACE),
    ]);
    if let Some(uri) = error.code.uri() {
        root.push_attribute(("href", uri));
    }
    writer.write_event(Event::Start(root))?;

    text_element(&mut writer, "title", "ERROR")?;
    text_element(&mut writer, "updated", updated)?;
    generator(&mut writer, &Generator::default())?;
    text_element(&mut writer, "summary", &error.message)?;
    text_element(&mut writer, "sword:treatment", ERROR_TREATMENT)?;

    writer.write_event(Event::End(BytesEnd::new("sword:error")))?;
    finish(writer)
}
