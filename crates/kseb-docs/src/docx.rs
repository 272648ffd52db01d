//! Report writer (WordprocessingML).
//!
//! Layout: cover page with an info table, a table of contents, then one
//! chapter per top-level section. Every sub-section carries a draft label
//! and an optional improvement guideline for the student to act on.

use chrono::NaiveDate;
use kseb_core::{ReportContext, ReportSection, ReportTable};

use crate::error::DocumentResult;
use crate::package::{Package, Relationships, XML_DECLARATION, rel};
use crate::xml::escape;

const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

const DOCUMENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const STYLES_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const FOOTER_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

/// Text width of an A4 page with one-inch margins, in twips.
const TEXT_WIDTH_TWIPS: usize = 9026;

const DEFAULT_FONT: &str = "맑은 고딕";

pub const DRAFT_LABEL: &str = "[초안]";
pub const GUIDELINE_LABEL: &str = "💡 발전 방향 가이드: ";
pub const TOC_TITLE: &str = "목   차";
pub const INFO_LABELS: [&str; 5] = ["과 목 명", "담당 교수", "소    속", "학    번", "이    름"];

const GUIDE_COLOR: &str = "666666";
const TABLE_HEADER_FILL: &str = "D9D9D9";

/// Character formatting of one run.
#[derive(Debug, Clone, Copy, Default)]
struct RunStyle {
    bold: bool,
    italic: bool,
    /// Font size in points.
    size: Option<u32>,
    color: Option<&'static str>,
}

impl RunStyle {
    const fn sized(size: u32) -> Self {
        Self {
            bold: false,
            italic: false,
            size: Some(size),
            color: None,
        }
    }

    const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    const fn color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }

    fn to_xml(self) -> String {
        let mut props = String::new();
        if self.bold {
            props.push_str("<w:b/>");
        }
        if self.italic {
            props.push_str("<w:i/>");
        }
        if let Some(color) = self.color {
            props.push_str(&format!(r#"<w:color w:val="{color}"/>"#));
        }
        if let Some(size) = self.size {
            let half_points = size * 2;
            props.push_str(&format!(r#"<w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/>"#));
        }
        if props.is_empty() {
            props
        } else {
            format!("<w:rPr>{props}</w:rPr>")
        }
    }
}

/// Paragraph formatting.
#[derive(Debug, Clone, Copy, Default)]
struct ParaStyle {
    style: Option<&'static str>,
    align: Option<&'static str>,
    /// Space before, in points.
    space_before: Option<u32>,
    /// Left indent, in twips.
    indent: Option<u32>,
    bottom_rule: bool,
}

impl ParaStyle {
    const fn styled(style: &'static str) -> Self {
        Self {
            style: Some(style),
            align: None,
            space_before: None,
            indent: None,
            bottom_rule: false,
        }
    }

    const fn aligned(mut self, align: &'static str) -> Self {
        self.align = Some(align);
        self
    }

    const fn centered() -> Self {
        Self {
            style: None,
            align: Some("center"),
            space_before: None,
            indent: None,
            bottom_rule: false,
        }
    }

    fn to_xml(self) -> String {
        let mut props = String::new();
        if let Some(style) = self.style {
            props.push_str(&format!(r#"<w:pStyle w:val="{style}"/>"#));
        }
        if self.bottom_rule {
            props.push_str(
                r#"<w:pBdr><w:bottom w:val="single" w:sz="12" w:space="1" w:color="000000"/></w:pBdr>"#,
            );
        }
        if let Some(points) = self.space_before {
            props.push_str(&format!(r#"<w:spacing w:before="{}"/>"#, points * 20));
        }
        if let Some(indent) = self.indent {
            props.push_str(&format!(r#"<w:ind w:left="{indent}"/>"#));
        }
        if let Some(align) = self.align {
            props.push_str(&format!(r#"<w:jc w:val="{align}"/>"#));
        }
        if props.is_empty() {
            props
        } else {
            format!("<w:pPr>{props}</w:pPr>")
        }
    }
}

/// A run; newlines in `text` become line breaks.
fn run(text: &str, style: RunStyle) -> String {
    let mut xml = format!("<w:r>{}", style.to_xml());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        xml.push_str(&format!(r#"<w:t xml:space="preserve">{}</w:t>"#, escape(line)));
    }
    xml.push_str("</w:r>");
    xml
}

fn paragraph(style: ParaStyle, runs: &[String]) -> String {
    format!("<w:p>{}{}</w:p>", style.to_xml(), runs.concat())
}

fn text_paragraph(style: ParaStyle, text: &str, run_style: RunStyle) -> String {
    paragraph(style, &[run(text, run_style)])
}

fn empty_paragraph() -> String {
    "<w:p/>".to_string()
}

fn page_break() -> String {
    r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#.to_string()
}

fn cell(width: usize, props: &str, content: &str) -> String {
    format!(
        r#"<w:tc><w:tcPr><w:tcW w:w="{width}" w:type="dxa"/>{props}</w:tcPr>{content}</w:tc>"#
    )
}

/// Body XML accumulator.
#[derive(Default)]
struct Body {
    xml: String,
}

impl Body {
    fn push(&mut self, fragment: &str) {
        self.xml.push_str(fragment);
    }

    fn cover(&mut self, title: &str, date: NaiveDate) {
        let spacer = ParaStyle {
            space_before: Some(60),
            ..ParaStyle::default()
        };
        self.push(&paragraph(spacer, &[]));
        self.push(&text_paragraph(
            ParaStyle::centered(),
            title,
            RunStyle::sized(26).bold(),
        ));
        let rule = ParaStyle {
            bottom_rule: true,
            ..ParaStyle::default()
        };
        self.push(&paragraph(rule, &[]));
        self.push(&text_paragraph(
            ParaStyle::default().aligned("right"),
            &date.format("%Y. %m. %d.").to_string(),
            RunStyle::default().italic(),
        ));
        let gap = ParaStyle {
            space_before: Some(150),
            ..ParaStyle::default()
        };
        self.push(&paragraph(gap, &[]));
        self.info_table();
    }

    /// Borderless label/value table; values are left blank with an underline.
    fn info_table(&mut self) {
        const LABEL_WIDTH: usize = 2400;
        const VALUE_WIDTH: usize = 4200;

        self.push(&format!(
            r#"<w:tbl><w:tblPr><w:tblW w:w="{}" w:type="dxa"/><w:jc w:val="center"/><w:tblBorders><w:top w:val="nil"/><w:left w:val="nil"/><w:bottom w:val="nil"/><w:right w:val="nil"/><w:insideH w:val="nil"/><w:insideV w:val="nil"/></w:tblBorders></w:tblPr><w:tblGrid><w:gridCol w:w="{LABEL_WIDTH}"/><w:gridCol w:w="{VALUE_WIDTH}"/></w:tblGrid>"#,
            LABEL_WIDTH + VALUE_WIDTH
        ));
        for label in INFO_LABELS {
            let label_cell = cell(
                LABEL_WIDTH,
                "",
                &text_paragraph(
                    ParaStyle::default().aligned("right"),
                    &format!("{label} :"),
                    RunStyle::sized(12).bold(),
                ),
            );
            let value_cell = cell(
                VALUE_WIDTH,
                r#"<w:tcBorders><w:bottom w:val="single" w:sz="4" w:space="0" w:color="000000"/></w:tcBorders>"#,
                &empty_paragraph(),
            );
            self.push(&format!("<w:tr>{label_cell}{value_cell}</w:tr>"));
        }
        self.push("</w:tbl>");
    }

    fn table_of_contents(&mut self, sections: &[ReportSection]) {
        self.push(&text_paragraph(
            ParaStyle::styled("Heading1").aligned("center"),
            TOC_TITLE,
            RunStyle::sized(20),
        ));
        for section in sections {
            let style = ParaStyle {
                indent: Some(720),
                ..ParaStyle::default()
            };
            self.push(&text_paragraph(style, &section.title, RunStyle::sized(14).bold()));
            for sub in &section.sub_sections {
                let style = ParaStyle {
                    indent: Some(1152),
                    ..ParaStyle::default()
                };
                self.push(&text_paragraph(style, &sub.title, RunStyle::sized(12)));
            }
        }
    }

    fn guideline(&mut self, guideline: Option<&str>) {
        let Some(text) = guideline.filter(|g| !g.trim().is_empty()) else {
            return;
        };
        self.push(&paragraph(
            ParaStyle::default(),
            &[
                run(GUIDELINE_LABEL, RunStyle::sized(10).bold().color(GUIDE_COLOR)),
                run(text, RunStyle::sized(10).italic()),
            ],
        ));
    }

    fn grid_table(&mut self, table: &ReportTable) {
        let columns = table.headers.len();
        let width = TEXT_WIDTH_TWIPS / columns.max(1);

        self.push(r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tblGrid>"#);
        for _ in 0..columns {
            self.push(&format!(r#"<w:gridCol w:w="{width}"/>"#));
        }
        self.push("</w:tblGrid><w:tr>");
        for header in &table.headers {
            self.push(&cell(
                width,
                &format!(r#"<w:shd w:val="clear" w:color="auto" w:fill="{TABLE_HEADER_FILL}"/>"#),
                &text_paragraph(ParaStyle::centered(), header, RunStyle::default().bold()),
            ));
        }
        self.push("</w:tr>");
        for row in &table.rows {
            self.push("<w:tr>");
            for i in 0..columns {
                let value = row.get(i).map_or("", String::as_str);
                self.push(&cell(
                    width,
                    "",
                    &text_paragraph(ParaStyle::default(), value, RunStyle::default()),
                ));
            }
            self.push("</w:tr>");
        }
        self.push("</w:tbl>");
    }

    fn section(&mut self, section: &ReportSection) {
        self.push(&text_paragraph(
            ParaStyle::styled("Heading1"),
            &section.title,
            RunStyle::default(),
        ));

        if section.sub_sections.is_empty() {
            self.push(&text_paragraph(ParaStyle::default(), &section.content, RunStyle::default()));
            self.guideline(section.guideline.as_deref());
            return;
        }

        for sub in &section.sub_sections {
            self.push(&text_paragraph(
                ParaStyle::styled("Heading2"),
                &sub.title,
                RunStyle::default(),
            ));
            self.push(&text_paragraph(
                ParaStyle::default(),
                DRAFT_LABEL,
                RunStyle::default().bold(),
            ));
            self.push(&text_paragraph(ParaStyle::default(), &sub.content, RunStyle::default()));
            if let Some(table) = sub.table.as_ref().filter(|t| t.is_renderable()) {
                self.grid_table(table);
            }
            self.guideline(sub.guideline.as_deref());
            self.push(&empty_paragraph());
        }
    }
}

fn document_xml(report: &ReportContext, date: NaiveDate, footer_id: &str) -> String {
    let mut body = Body::default();
    body.cover(&report.report_title, date);
    body.push(&page_break());
    body.table_of_contents(&report.main_sections);
    body.push(&page_break());

    let last = report.main_sections.len().saturating_sub(1);
    for (i, section) in report.main_sections.iter().enumerate() {
        body.section(section);
        if i < last {
            body.push(&page_break());
        }
    }

    format!(
        r#"{XML_DECLARATION}<w:document {W_NS}><w:body>{}<w:sectPr><w:footerReference w:type="default" r:id="{footer_id}"/><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="851" w:footer="992" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        body.xml
    )
}

fn styles_xml() -> String {
    format!(
        r#"{XML_DECLARATION}<w:styles {W_NS}><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{DEFAULT_FONT}" w:eastAsia="{DEFAULT_FONT}" w:hAnsi="{DEFAULT_FONT}" w:cs="{DEFAULT_FONT}"/><w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US" w:eastAsia="ko-KR"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/><w:rPr><w:rFonts w:ascii="{DEFAULT_FONT}" w:eastAsia="{DEFAULT_FONT}" w:hAnsi="{DEFAULT_FONT}"/><w:sz w:val="22"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="1F3864"/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:color w:val="2F5496"/><w:sz w:val="26"/><w:szCs w:val="26"/></w:rPr></w:style><w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/><w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:basedOn w:val="TableNormal"/><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style></w:styles>"#
    )
}

fn footer_xml() -> String {
    format!(
        r#"{XML_DECLARATION}<w:ftr {W_NS}><w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:fldSimple w:instr=" PAGE "><w:r><w:t>1</w:t></w:r></w:fldSimple></w:p></w:ftr>"#
    )
}

/// Render a report outline to `.docx` bytes.
pub fn build_report_docx(report: &ReportContext, date: NaiveDate) -> DocumentResult<Vec<u8>> {
    let mut package = Package::new();

    let mut rels = Relationships::default();
    rels.add(rel::STYLES, "styles.xml");
    let footer_id = rels.add(rel::FOOTER, "footer1.xml");

    package.add_root(
        "word/document.xml",
        DOCUMENT_TYPE,
        &document_xml(report, date, &footer_id),
        &report.report_title,
    )?;
    package.write("word/_rels/document.xml.rels", &rels.to_xml())?;
    package.add_part("word/styles.xml", STYLES_TYPE, &styles_xml())?;
    package.add_part("word/footer1.xml", FOOTER_TYPE, &footer_xml())?;

    let bytes = package.finish()?;
    tracing::debug!(
        title = %report.report_title,
        sections = report.main_sections.len(),
        size = bytes.len(),
        "Report document built"
    );
    Ok(bytes)
}
