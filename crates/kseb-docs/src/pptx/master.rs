//! Static presentation parts: theme, slide master, named layouts, notes master.

use kseb_core::SlideLayout;

use crate::package::XML_DECLARATION;
use crate::xml::escape;

pub(super) const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// 13.333 x 7.5 inches in EMU.
pub(super) const SLIDE_WIDTH: i64 = 12_192_000;
pub(super) const SLIDE_HEIGHT: i64 = 6_858_000;

const EMU_PER_INCH: f64 = 914_400.0;
const FONT: &str = "맑은 고딕";

#[allow(clippy::cast_possible_truncation)]
fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Placeholder kinds used by the layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Placeholder {
    Title,
    CenteredTitle,
    Subtitle,
    /// Body text placeholder with the given index.
    Body(u32),
}

impl Placeholder {
    /// `<p:ph>` element.
    pub(super) fn ph(self) -> String {
        match self {
            Self::Title => r#"<p:ph type="title"/>"#.to_string(),
            Self::CenteredTitle => r#"<p:ph type="ctrTitle"/>"#.to_string(),
            Self::Subtitle => r#"<p:ph type="subTitle" idx="1"/>"#.to_string(),
            Self::Body(idx) => format!(r#"<p:ph idx="{idx}"/>"#),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Title | Self::CenteredTitle => "Title",
            Self::Subtitle => "Subtitle",
            Self::Body(_) => "Content",
        }
    }
}

/// Placeholder with its frame in inches.
type Frame = (Placeholder, f64, f64, f64, f64);

/// Placeholder frames of each named layout.
pub(super) fn layout_frames(layout: SlideLayout) -> Vec<Frame> {
    let title = (Placeholder::Title, 0.6, 0.4, 12.13, 1.2);
    let body = (Placeholder::Body(1), 0.6, 1.8, 12.13, 5.0);
    match layout {
        SlideLayout::Title => vec![
            (Placeholder::CenteredTitle, 1.0, 2.0, 11.33, 1.6),
            (Placeholder::Subtitle, 1.0, 3.9, 11.33, 1.8),
        ],
        SlideLayout::SectionHeader => vec![
            (Placeholder::Title, 0.8, 2.4, 11.73, 1.4),
            (Placeholder::Body(1), 0.8, 4.0, 11.73, 1.2),
        ],
        SlideLayout::Qna => vec![(Placeholder::Title, 1.0, 2.9, 11.33, 1.6)],
        SlideLayout::ImageRight => vec![
            title,
            (Placeholder::Body(1), 0.6, 1.8, 6.2, 5.0),
            (Placeholder::Body(2), 7.1, 1.8, 5.63, 5.0),
        ],
        SlideLayout::Body | SlideLayout::Toc | SlideLayout::Conclusion => vec![title, body],
    }
}

fn placeholder_shape(id: usize, frame: Frame) -> String {
    let (ph, x, y, cx, cy) = frame;
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{} {}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr><p:txBody><a:bodyPr wrap="square"><a:normAutofit/></a:bodyPr><a:lstStyle/><a:p><a:endParaRPr lang="ko-KR"/></a:p></p:txBody></p:sp>"#,
        ph.name(),
        id - 1,
        ph.ph(),
        emu(x),
        emu(y),
        emu(cx),
        emu(cy)
    )
}

fn group_header() -> &'static str {
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
}

pub(super) fn shape_tree(shapes: &str) -> String {
    format!("<p:spTree>{}{shapes}</p:spTree>", group_header())
}

pub(super) fn layout_xml(layout: SlideLayout) -> String {
    let shapes: String = layout_frames(layout)
        .into_iter()
        .enumerate()
        .map(|(i, frame)| placeholder_shape(i + 2, frame))
        .collect();
    let kind = match layout {
        SlideLayout::Title => "title",
        SlideLayout::SectionHeader => "secHead",
        SlideLayout::Qna => "titleOnly",
        SlideLayout::ImageRight => "twoObj",
        SlideLayout::Body | SlideLayout::Toc | SlideLayout::Conclusion => "obj",
    };
    format!(
        r#"{XML_DECLARATION}<p:sldLayout {NS} type="{kind}" preserve="1"><p:cSld name="{}">{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        escape(layout.name()),
        shape_tree(&shapes)
    )
}

fn level_props(level: u8, size: u32, indent_emu: i64) -> String {
    format!(
        r#"<a:lvl{level}pPr marL="{}" indent="-228600"><a:buFont typeface="Arial"/><a:buChar char="•"/><a:defRPr sz="{size}"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/></a:defRPr></a:lvl{level}pPr>"#,
        indent_emu + 228_600
    )
}

/// Slide master; `layout_rel_ids` are the relationship ids of the layouts in
/// [`SlideLayout::ALL`] order.
pub(super) fn slide_master_xml(layout_rel_ids: &[String]) -> String {
    let shapes = [
        placeholder_shape(2, (Placeholder::Title, 0.6, 0.4, 12.13, 1.2)),
        placeholder_shape(3, (Placeholder::Body(1), 0.6, 1.8, 12.13, 5.0)),
    ]
    .concat()
    // The master's body placeholder is typed rather than indexed.
    .replace(r#"<p:ph idx="1"/>"#, r#"<p:ph type="body" idx="1"/>"#);

    let layout_ids: String = layout_rel_ids
        .iter()
        .enumerate()
        .map(|(i, rid)| format!(r#"<p:sldLayoutId id="{}" r:id="{rid}"/>"#, 2_147_483_649 + i))
        .collect();

    let body_levels = [
        level_props(1, 2400, 0),
        level_props(2, 2000, 457_200),
        level_props(3, 1800, 914_400),
    ]
    .concat();

    format!(
        r#"{XML_DECLARATION}<p:sldMaster {NS}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>{}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{layout_ids}</p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr algn="l"><a:defRPr sz="3600" b="1"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/></a:defRPr></a:lvl1pPr></p:titleStyle><p:bodyStyle>{body_levels}</p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#,
        shape_tree(&shapes)
    )
}

pub(super) fn notes_master_xml() -> String {
    let body = placeholder_shape(2, (Placeholder::Body(1), 0.75, 4.6, 6.0, 4.1))
        .replace(r#"<p:ph idx="1"/>"#, r#"<p:ph type="body" idx="1"/>"#);
    format!(
        r#"{XML_DECLARATION}<p:notesMaster {NS}><p:cSld>{}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/></p:notesMaster>"#,
        shape_tree(&body)
    )
}

pub(super) fn theme_xml(name: &str) -> String {
    format!(
        r#"{XML_DECLARATION}<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="{name}"><a:themeElements><a:clrScheme name="KSEB"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F3864"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="KSEB"><a:majorFont><a:latin typeface="{FONT}"/><a:ea typeface="{FONT}"/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{FONT}"/><a:ea typeface="{FONT}"/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="KSEB"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#
    )
}

pub(super) fn pres_props_xml() -> String {
    format!(r#"{XML_DECLARATION}<p:presentationPr {NS}/>"#)
}

pub(super) fn view_props_xml() -> String {
    format!(
        r#"{XML_DECLARATION}<p:viewPr {NS}><p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr><p:gridSpacing cx="72008" cy="72008"/></p:viewPr>"#
    )
}

pub(super) fn table_styles_xml() -> String {
    format!(
        r#"{XML_DECLARATION}<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
    )
}
