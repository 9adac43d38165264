//! Pascal VOC annotation documents.
//!
//! Each converted image gets one `<annotation>` document holding a single
//! object. Documents are written with two-space indentation and a UTF-8
//! declaration, and can be read back for verification.

use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

use crate::error::Result;
use crate::types::{BndBox, ClothType, ImageSize, LinkedRecord};

pub const FOLDER: &str = "DeepFashion";
pub const SOURCE: &str = "TBD";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VocBndBox {
    pub xmin: String,
    pub ymin: String,
    pub xmax: String,
    pub ymax: String,
}

impl From<&BndBox> for VocBndBox {
    fn from(bndbox: &BndBox) -> Self {
        Self {
            xmin: bndbox.xmin.clone(),
            ymin: bndbox.ymin.clone(),
            xmax: bndbox.xmax.clone(),
            ymax: bndbox.ymax.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VocObject {
    /// Fine-grained category label (1..=50), as written in the category table
    pub label: String,
    /// Coarse garment type derived from `label`
    pub name: String,
    pub bndbox: VocBndBox,
    pub difficult: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VocSize {
    pub width: u32,
    pub height: u32,
    pub depth: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnnotationDocument {
    pub filename: String,
    pub folder: String,
    pub object: VocObject,
    pub segmented: u8,
    pub size: VocSize,
    pub source: String,
}

impl AnnotationDocument {
    pub fn new(record: &LinkedRecord, size: ImageSize) -> Self {
        Self {
            filename: record.image_id.clone(),
            folder: FOLDER.to_string(),
            object: VocObject {
                label: record.label_text.clone(),
                name: ClothType::from_label(record.category_label)
                    .as_str()
                    .to_string(),
                bndbox: VocBndBox::from(&record.bndbox),
                difficult: 0,
            },
            segmented: 0,
            size: VocSize {
                width: size.width,
                height: size.height,
                depth: size.depth,
            },
            source: SOURCE.to_string(),
        }
    }

    /// Serialize the document as indented XML.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<()> {
        let mut writer = EmitterConfig::new()
            .perform_indent(true)
            .indent_string("  ")
            .create_writer(sink);

        writer.write(XmlEvent::StartDocument {
            version: XmlVersion::Version10,
            encoding: Some("utf-8"),
            standalone: None,
        })?;
        writer.write(XmlEvent::start_element("annotation"))?;
        text_element(&mut writer, "filename", &self.filename)?;
        text_element(&mut writer, "folder", &self.folder)?;

        writer.write(XmlEvent::start_element("object"))?;
        text_element(&mut writer, "label", &self.object.label)?;
        text_element(&mut writer, "name", &self.object.name)?;
        writer.write(XmlEvent::start_element("bndbox"))?;
        let bndbox = &self.object.bndbox;
        text_element(&mut writer, "xmax", &bndbox.xmax)?;
        text_element(&mut writer, "xmin", &bndbox.xmin)?;
        text_element(&mut writer, "ymax", &bndbox.ymax)?;
        text_element(&mut writer, "ymin", &bndbox.ymin)?;
        writer.write(XmlEvent::end_element())?;
        text_element(&mut writer, "difficult", &self.object.difficult.to_string())?;
        writer.write(XmlEvent::end_element())?;

        text_element(&mut writer, "segmented", &self.segmented.to_string())?;

        writer.write(XmlEvent::start_element("size"))?;
        text_element(&mut writer, "depth", &self.size.depth.to_string())?;
        text_element(&mut writer, "height", &self.size.height.to_string())?;
        text_element(&mut writer, "width", &self.size.width.to_string())?;
        writer.write(XmlEvent::end_element())?;

        text_element(&mut writer, "source", &self.source)?;
        writer.write(XmlEvent::end_element())?;

        let mut sink = writer.into_inner();
        sink.write_all(b"\n")?;
        sink.flush()?;
        Ok(())
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn text_element<W: Write>(writer: &mut EventWriter<W>, name: &str, text: &str) -> Result<()> {
    writer.write(XmlEvent::start_element(name))?;
    writer.write(XmlEvent::characters(text))?;
    writer.write(XmlEvent::end_element())?;
    Ok(())
}

/// Write a document to `path`, replacing any existing file.
pub fn write_annotation(document: &AnnotationDocument, path: &Path) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    document.write_to(file)
}

/// Parse a previously written document.
pub fn read_annotation(path: &Path) -> Result<AnnotationDocument> {
    let content = fs::read_to_string(path)?;
    Ok(serde_xml_rs::from_str(&content)?)
}
