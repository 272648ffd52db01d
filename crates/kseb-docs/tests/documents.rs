//! Built packages are valid zips with the expected parts and text.

use std::io::{Cursor, Read};

use chrono::NaiveDate;
use kseb_core::{
    DeckContext, ReportContext, ReportSection, ReportSubSection, ReportTable, SlideLayout,
    SlideSpec, TextBlock,
};
use kseb_docs::{
    DRAFT_LABEL, GUIDE_SLIDE_TITLE, GUIDELINE_LABEL, TOC_TITLE, build_deck_pptx, build_report_docx,
};
use zip::ZipArchive;

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

fn part_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn sample_report() -> ReportContext {
    ReportContext {
        report_title: "AI & 협업 도구".to_string(),
        main_sections: vec![
            ReportSection {
                title: "I. 서론".to_string(),
                content: "연구 배경".to_string(),
                guideline: Some("배경 통계를 보강하세요.".to_string()),
                sub_sections: vec![],
            },
            ReportSection {
                title: "II. 본론".to_string(),
                content: String::new(),
                guideline: None,
                sub_sections: vec![ReportSubSection {
                    title: "1. 시장 현황".to_string(),
                    content: "시장 규모는\n증가 추세".to_string(),
                    guideline: Some("출처를 명시하세요.".to_string()),
                    table: Some(ReportTable {
                        headers: vec!["연도".to_string(), "규모".to_string()],
                        rows: vec![vec!["2024".to_string(), "10".to_string()]],
                    }),
                }],
            },
            ReportSection {
                title: "III. 참고문헌".to_string(),
                content: "[1] 자료".to_string(),
                guideline: None,
                sub_sections: vec![],
            },
        ],
    }
}

#[test]
fn report_package_has_required_parts() {
    let date = NaiveDate::from_ymd_opt(2025, 8, 4).unwrap();
    let bytes = build_report_docx(&sample_report(), date).unwrap();

    let names = part_names(&bytes);
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/_rels/document.xml.rels",
        "word/styles.xml",
        "word/footer1.xml",
        "docProps/core.xml",
    ] {
        assert!(names.iter().any(|n| n == part), "missing {part}");
    }

    let types = read_part(&bytes, "[Content_Types].xml");
    assert!(types.contains(r#"PartName="/word/document.xml""#));
    assert!(read_part(&bytes, "word/footer1.xml").contains(r#"w:instr=" PAGE ""#));
}

#[test]
fn report_body_follows_outline() {
    let date = NaiveDate::from_ymd_opt(2025, 8, 4).unwrap();
    let bytes = build_report_docx(&sample_report(), date).unwrap();
    let doc = read_part(&bytes, "word/document.xml");

    assert!(doc.contains("AI &amp; 협업 도구"));
    assert!(doc.contains("2025. 08. 04."));
    assert!(doc.contains(TOC_TITLE));
    assert!(doc.contains("과 목 명 :"));
    assert!(doc.contains(DRAFT_LABEL));
    assert!(doc.contains(GUIDELINE_LABEL));
    assert!(doc.contains("시장 규모는</w:t><w:br/>"));
    assert!(doc.contains(r#"<w:tblStyle w:val="TableGrid"/>"#));

    // Cover->TOC, TOC->body and two breaks between the three sections.
    assert_eq!(doc.matches(r#"<w:br w:type="page"/>"#).count(), 4);

    // Section order is preserved.
    let intro = doc.find("I. 서론").unwrap();
    let refs = doc.rfind("III. 참고문헌").unwrap();
    assert!(intro < refs);
}

fn sample_deck() -> DeckContext {
    DeckContext {
        presentation_title: "원격 협업의 미래".to_string(),
        presenter: "김민수".to_string(),
        team_members: "이지현, 박서준".to_string(),
        major: "경영학".to_string(),
        slides: vec![
            SlideSpec {
                layout: SlideLayout::Toc,
                title: "목차".to_string(),
                content: TextBlock::Lines(vec!["1. 배경".to_string(), "2. 사례".to_string()]),
                guideline: Some(TextBlock::Lines(vec![
                    "[Critique] 너무 단순함".to_string(),
                    "[Action Items] 키워드 추가".to_string(),
                ])),
                image_description: None,
            },
            SlideSpec {
                layout: SlideLayout::ImageRight,
                title: "성장 추이".to_string(),
                content: TextBlock::Text("- 매년 20% 성장".to_string()),
                guideline: None,
                image_description: Some("연도별 막대 그래프".to_string()),
            },
        ],
    }
}

#[test]
fn deck_has_guide_title_content_and_closing_slides() {
    let bytes = build_deck_pptx(&sample_deck()).unwrap();
    let names = part_names(&bytes);

    let slides = names
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count();
    assert_eq!(slides, 5);
    assert_eq!(
        names.iter().filter(|n| n.starts_with("ppt/slideLayouts/slideLayout")).count(),
        7
    );

    assert!(read_part(&bytes, "ppt/slides/slide1.xml").contains(GUIDE_SLIDE_TITLE));
    assert!(read_part(&bytes, "ppt/slides/slide2.xml").contains("발표자: 김민수"));
    assert!(read_part(&bytes, "ppt/slides/slide5.xml").contains("Q &amp; A"));

    let image_slide = read_part(&bytes, "ppt/slides/slide4.xml");
    assert!(image_slide.contains(r#"<a:pPr lvl="1"/>"#));
    assert!(image_slide.contains("매년 20% 성장"));
    assert!(image_slide.contains("(연도별 막대 그래프)"));
}

#[test]
fn deck_layouts_and_notes_are_wired() {
    let bytes = build_deck_pptx(&sample_deck()).unwrap();

    let toc_layout = read_part(&bytes, "ppt/slideLayouts/slideLayout4.xml");
    assert!(toc_layout.contains(r#"<p:cSld name="Layout_TOC">"#));

    let rels = read_part(&bytes, "ppt/slides/_rels/slide3.xml.rels");
    assert!(rels.contains("../slideLayouts/slideLayout4.xml"));
    assert!(rels.contains("../notesSlides/notesSlide3.xml"));

    let notes = read_part(&bytes, "ppt/notesSlides/notesSlide3.xml");
    assert!(notes.contains("[Critique] 너무 단순함"));
    assert!(notes.contains("[Action Items] 키워드 추가"));

    let presentation = read_part(&bytes, "ppt/presentation.xml");
    assert!(presentation.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
    assert_eq!(presentation.matches("<p:sldId ").count(), 5);
}
