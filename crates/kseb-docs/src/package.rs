//! Open Packaging Conventions container shared by the .docx and .pptx writers.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::DocumentResult;
use crate::xml::escape;

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Relationship type URIs.
pub(crate) mod rel {
    pub const OFFICE_DOCUMENT: &str = "officeDocument";
    pub const STYLES: &str = "styles";
    pub const FOOTER: &str = "footer";
    pub const THEME: &str = "theme";
    pub const SLIDE_MASTER: &str = "slideMaster";
    pub const SLIDE_LAYOUT: &str = "slideLayout";
    pub const SLIDE: &str = "slide";
    pub const NOTES_MASTER: &str = "notesMaster";
    pub const NOTES_SLIDE: &str = "notesSlide";
    pub const PRES_PROPS: &str = "presProps";
    pub const VIEW_PROPS: &str = "viewProps";
    pub const TABLE_STYLES: &str = "tableStyles";
}

/// A `.rels` part under construction.
#[derive(Debug, Default)]
pub(crate) struct Relationships {
    entries: Vec<(String, String, String)>,
}

impl Relationships {
    /// Add an office-document relationship; returns its id (`rId1`, ...).
    pub fn add(&mut self, kind: &str, target: impl Into<String>) -> String {
        self.add_uri(format!("{REL_BASE}/{kind}"), target)
    }

    pub fn add_uri(&mut self, kind: impl Into<String>, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push((id.clone(), kind.into(), target.into()));
        id
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, kind, target) in &self.entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{id}" Type="{kind}" Target="{}"/>"#,
                escape(target)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Zip archive plus the `[Content_Types].xml` overrides collected while
/// parts are added.
pub(crate) struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    overrides: Vec<(String, &'static str)>,
}

impl Package {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            overrides: Vec::new(),
        }
    }

    /// Write a part and register its content type.
    pub fn add_part(
        &mut self,
        path: &str,
        content_type: &'static str,
        xml: &str,
    ) -> DocumentResult<()> {
        self.overrides.push((format!("/{path}"), content_type));
        self.write(path, xml)
    }

    /// Write a part covered by a default content type (`.rels`).
    pub fn write(&mut self, path: &str, xml: &str) -> DocumentResult<()> {
        self.zip.start_file(path, SimpleFileOptions::default())?;
        self.zip.write_all(xml.as_bytes())?;
        Ok(())
    }

    /// Package-level relationships and core properties.
    pub fn add_root(
        &mut self,
        main_part: &str,
        main_content_type: &'static str,
        main_xml: &str,
        title: &str,
    ) -> DocumentResult<()> {
        let mut rels = Relationships::default();
        rels.add(rel::OFFICE_DOCUMENT, main_part);
        rels.add_uri(
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            "docProps/core.xml",
        );
        self.write("_rels/.rels", &rels.to_xml())?;
        self.add_part(main_part, main_content_type, main_xml)?;
        self.add_part(
            "docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
            &core_properties(title),
        )
    }

    pub fn finish(mut self) -> DocumentResult<Vec<u8>> {
        let mut types = String::from(XML_DECLARATION);
        types.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        types.push_str(
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        );
        types.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        for (part, content_type) in &self.overrides {
            types.push_str(&format!(
                r#"<Override PartName="{part}" ContentType="{content_type}"/>"#
            ));
        }
        types.push_str("</Types>");
        self.write("[Content_Types].xml", &types)?;

        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

fn core_properties(title: &str) -> String {
    format!(
        r#"{XML_DECLARATION}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>KSEB AI</dc:creator></cp:coreProperties>"#,
        escape(title)
    )
}
