//! Slide deck writer (PresentationML).
//!
//! The package carries its own slide master with the named layouts the
//! outline refers to, so users restyle the whole deck from one place.

mod master;

use kseb_core::{DeckContext, SlideLayout, SlideSpec};

use crate::error::DocumentResult;
use crate::package::{Package, Relationships, XML_DECLARATION, rel};
use crate::xml::escape;
use master::{NS, Placeholder, SLIDE_HEIGHT, SLIDE_WIDTH, shape_tree};

const PRESENTATION_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const MASTER_TYPE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const LAYOUT_TYPE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const SLIDE_TYPE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const NOTES_MASTER_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
const NOTES_SLIDE_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
const THEME_TYPE: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const PRES_PROPS_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const VIEW_PROPS_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
const TABLE_STYLES_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";

pub const GUIDE_SLIDE_TITLE: &str = "⚠️ 중요: PPT 디자인 수정 방법 (슬라이드 마스터)";
pub const CLOSING_SLIDE_TITLE: &str = "Q & A";
pub const IMAGE_PLACEHOLDER_TEXT: &str = "⬇️\n여기에 이미지 추가";
const NO_IMAGE_DESCRIPTION: &str = "이미지 설명 없음";
const NO_GUIDELINE: &str = "가이드라인 없음";

/// One paragraph of a text frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Para {
    text: String,
    level: u8,
    bold: bool,
    italic: bool,
    /// Font size in points.
    size: Option<u32>,
}

impl Para {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    const fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    const fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn to_xml(&self) -> String {
        let mut run_props = String::from(r#"<a:rPr lang="ko-KR" altLang="en-US" dirty="0""#);
        if let Some(size) = self.size {
            run_props.push_str(&format!(r#" sz="{}""#, size * 100));
        }
        if self.bold {
            run_props.push_str(r#" b="1""#);
        }
        if self.italic {
            run_props.push_str(r#" i="1""#);
        }
        run_props.push_str("/>");

        let runs: Vec<String> = self
            .text
            .split('\n')
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("<a:r>{run_props}<a:t>{}</a:t></a:r>", escape(line))
                }
            })
            .collect();

        let p_props = if self.level > 0 {
            format!(r#"<a:pPr lvl="{}"/>"#, self.level)
        } else {
            String::new()
        };
        format!(
            r#"<a:p>{p_props}{}<a:endParaRPr lang="ko-KR" altLang="en-US" dirty="0"/></a:p>"#,
            runs.join(&format!("<a:br>{run_props}</a:br>"))
        )
    }
}

/// Content lines become paragraphs; a leading `-` marks a level-1 bullet.
/// Dashes and spaces are trimmed from both ends of each line.
fn content_paragraphs(spec: &SlideSpec) -> Vec<Para> {
    spec.content
        .lines()
        .into_iter()
        .map(|line| {
            let level = u8::from(line.trim().starts_with('-'));
            Para::new(line.trim_matches(['-', ' ']).trim()).level(level)
        })
        .collect()
}

/// A placeholder shape on a slide, inheriting its frame from the layout.
fn placeholder(id: usize, ph: Placeholder, paragraphs: &[Para]) -> String {
    let body: String = if paragraphs.is_empty() {
        "<a:p/>".to_string()
    } else {
        paragraphs.iter().map(Para::to_xml).collect()
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Placeholder {}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/>{body}</p:txBody></p:sp>"#,
        id - 1,
        ph.ph()
    )
}

fn slide_xml(shapes: &[(Placeholder, Vec<Para>)]) -> String {
    let body: String = shapes
        .iter()
        .enumerate()
        .map(|(i, (ph, paras))| placeholder(i + 2, *ph, paras))
        .collect();
    format!(
        r#"{XML_DECLARATION}<p:sld {NS}><p:cSld>{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        shape_tree(&body)
    )
}

fn notes_xml(text: &str) -> String {
    let body = placeholder(2, Placeholder::Body(1), &[Para::new(text)])
        .replace(r#"<p:ph idx="1"/>"#, r#"<p:ph type="body" idx="1"/>"#);
    format!(
        r#"{XML_DECLARATION}<p:notes {NS}><p:cSld>{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>"#,
        shape_tree(&body)
    )
}

/// A slide ready to be written.
struct PlannedSlide {
    layout: SlideLayout,
    shapes: Vec<(Placeholder, Vec<Para>)>,
    notes: Option<String>,
}

fn guide_slide() -> PlannedSlide {
    PlannedSlide {
        layout: SlideLayout::Body,
        shapes: vec![
            (Placeholder::Title, vec![Para::new(GUIDE_SLIDE_TITLE)]),
            (
                Placeholder::Body(1),
                vec![
                    Para::new("이 PPT의 배경, 로고, 글꼴 등 공통 디자인 요소는 '슬라이드 마스터'에서 관리됩니다.")
                        .size(18),
                    Para::new("배경 이미지나 로고 등을 수정/삭제하시려면, 이 파일의 슬라이드 마스터에서 직접 편집해야 합니다.")
                        .size(16)
                        .level(1),
                    Para::new("수정 방법: [보기] 탭 → [슬라이드 마스터]")
                        .bold()
                        .size(16)
                        .level(2),
                    Para::new("\n이 안내 슬라이드는 최종 발표 전에 삭제하시면 됩니다.")
                        .italic()
                        .size(14),
                ],
            ),
        ],
        notes: None,
    }
}

fn title_slide(deck: &DeckContext) -> PlannedSlide {
    PlannedSlide {
        layout: SlideLayout::Title,
        shapes: vec![
            (Placeholder::CenteredTitle, vec![Para::new(&deck.presentation_title)]),
            (
                Placeholder::Subtitle,
                vec![Para::new(format!(
                    "발표자: {}\n팀원: {}\n전공: {}",
                    deck.presenter, deck.team_members, deck.major
                ))],
            ),
        ],
        notes: None,
    }
}

fn content_slide(spec: &SlideSpec) -> PlannedSlide {
    let title = (Placeholder::Title, vec![Para::new(&spec.title)]);
    let body = (Placeholder::Body(1), content_paragraphs(spec));
    let shapes = if spec.layout == SlideLayout::ImageRight {
        let description = spec
            .image_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(NO_IMAGE_DESCRIPTION);
        vec![
            title,
            body,
            (
                Placeholder::Body(2),
                vec![
                    Para::new(IMAGE_PLACEHOLDER_TEXT).bold().size(18),
                    Para::new(format!("({description})")).size(14),
                ],
            ),
        ]
    } else {
        vec![title, body]
    };

    let notes = spec
        .guideline
        .as_ref()
        .map(kseb_core::TextBlock::joined)
        .unwrap_or_else(|| NO_GUIDELINE.to_string());

    PlannedSlide {
        layout: spec.layout,
        shapes,
        notes: Some(notes),
    }
}

fn closing_slide() -> PlannedSlide {
    PlannedSlide {
        layout: SlideLayout::Qna,
        shapes: vec![(Placeholder::Title, vec![Para::new(CLOSING_SLIDE_TITLE)])],
        notes: None,
    }
}

fn plan(deck: &DeckContext) -> Vec<PlannedSlide> {
    let mut slides = vec![guide_slide(), title_slide(deck)];
    slides.extend(deck.slides.iter().map(content_slide));
    slides.push(closing_slide());
    slides
}

fn layout_index(layout: SlideLayout) -> usize {
    SlideLayout::ALL
        .iter()
        .position(|l| *l == layout)
        .unwrap_or(1)
        + 1
}

/// Render a deck outline to `.pptx` bytes.
///
/// Slide order: editing guide, title slide, one slide per outline entry,
/// closing Q&A slide.
pub fn build_deck_pptx(deck: &DeckContext) -> DocumentResult<Vec<u8>> {
    let mut package = Package::new();
    let slides = plan(deck);

    // Master, layouts and theme
    let mut master_rels = Relationships::default();
    let layout_rel_ids: Vec<String> = (1..=SlideLayout::ALL.len())
        .map(|n| master_rels.add(rel::SLIDE_LAYOUT, format!("../slideLayouts/slideLayout{n}.xml")))
        .collect();
    master_rels.add(rel::THEME, "../theme/theme1.xml");
    package.add_part(
        "ppt/slideMasters/slideMaster1.xml",
        MASTER_TYPE,
        &master::slide_master_xml(&layout_rel_ids),
    )?;
    package.write("ppt/slideMasters/_rels/slideMaster1.xml.rels", &master_rels.to_xml())?;

    for (i, layout) in SlideLayout::ALL.into_iter().enumerate() {
        let n = i + 1;
        let mut rels = Relationships::default();
        rels.add(rel::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        package.add_part(
            &format!("ppt/slideLayouts/slideLayout{n}.xml"),
            LAYOUT_TYPE,
            &master::layout_xml(layout),
        )?;
        package.write(&format!("ppt/slideLayouts/_rels/slideLayout{n}.xml.rels"), &rels.to_xml())?;
    }

    package.add_part("ppt/theme/theme1.xml", THEME_TYPE, &master::theme_xml("KSEB"))?;
    package.add_part("ppt/theme/theme2.xml", THEME_TYPE, &master::theme_xml("KSEB Notes"))?;

    let mut notes_master_rels = Relationships::default();
    notes_master_rels.add(rel::THEME, "../theme/theme2.xml");
    package.add_part(
        "ppt/notesMasters/notesMaster1.xml",
        NOTES_MASTER_TYPE,
        &master::notes_master_xml(),
    )?;
    package.write(
        "ppt/notesMasters/_rels/notesMaster1.xml.rels",
        &notes_master_rels.to_xml(),
    )?;

    // Slides and their notes
    let mut pres_rels = Relationships::default();
    let master_id = pres_rels.add(rel::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
    let notes_master_id = pres_rels.add(rel::NOTES_MASTER, "notesMasters/notesMaster1.xml");
    pres_rels.add(rel::THEME, "theme/theme1.xml");
    pres_rels.add(rel::PRES_PROPS, "presProps.xml");
    pres_rels.add(rel::VIEW_PROPS, "viewProps.xml");
    pres_rels.add(rel::TABLE_STYLES, "tableStyles.xml");

    let mut slide_ids = String::new();
    for (i, slide) in slides.iter().enumerate() {
        let n = i + 1;
        let mut rels = Relationships::default();
        rels.add(
            rel::SLIDE_LAYOUT,
            format!("../slideLayouts/slideLayout{}.xml", layout_index(slide.layout)),
        );

        if let Some(notes) = &slide.notes {
            rels.add(rel::NOTES_SLIDE, format!("../notesSlides/notesSlide{n}.xml"));
            let mut notes_rels = Relationships::default();
            notes_rels.add(rel::NOTES_MASTER, "../notesMasters/notesMaster1.xml");
            notes_rels.add(rel::SLIDE, format!("../slides/slide{n}.xml"));
            package.add_part(
                &format!("ppt/notesSlides/notesSlide{n}.xml"),
                NOTES_SLIDE_TYPE,
                &notes_xml(notes),
            )?;
            package.write(
                &format!("ppt/notesSlides/_rels/notesSlide{n}.xml.rels"),
                &notes_rels.to_xml(),
            )?;
        }

        package.add_part(&format!("ppt/slides/slide{n}.xml"), SLIDE_TYPE, &slide_xml(&slide.shapes))?;
        package.write(&format!("ppt/slides/_rels/slide{n}.xml.rels"), &rels.to_xml())?;

        let rid = pres_rels.add(rel::SLIDE, format!("slides/slide{n}.xml"));
        slide_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="{rid}"/>"#, 255 + n));
    }

    package.add_part("ppt/presProps.xml", PRES_PROPS_TYPE, &master::pres_props_xml())?;
    package.add_part("ppt/viewProps.xml", VIEW_PROPS_TYPE, &master::view_props_xml())?;
    package.add_part("ppt/tableStyles.xml", TABLE_STYLES_TYPE, &master::table_styles_xml())?;
    package.write("ppt/_rels/presentation.xml.rels", &pres_rels.to_xml())?;

    let presentation = format!(
        r#"{XML_DECLARATION}<p:presentation {NS} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="{master_id}"/></p:sldMasterIdLst><p:notesMasterIdLst><p:notesMasterId r:id="{notes_master_id}"/></p:notesMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="{SLIDE_WIDTH}" cy="{SLIDE_HEIGHT}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    );
    package.add_root(
        "ppt/presentation.xml",
        PRESENTATION_TYPE,
        &presentation,
        &deck.presentation_title,
    )?;

    let bytes = package.finish()?;
    tracing::debug!(
        title = %deck.presentation_title,
        slides = slides.len(),
        size = bytes.len(),
        "Slide deck built"
    );
    Ok(bytes)
}
