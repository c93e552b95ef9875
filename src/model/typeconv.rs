//! String <-> value conversions for stored property values.

use egui::{Color32, Vec2, vec2};

/// Sentinel for an unspecified coordinate or dimension.
pub(crate) const DEFAULT_COORD: i32 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Size {
    pub(crate) w: i32,
    pub(crate) h: i32,
}

impl Size {
    pub(crate) const DEFAULT: Size = Size::new(DEFAULT_COORD, DEFAULT_COORD);

    pub(crate) const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    pub(crate) const fn is_default(&self) -> bool {
        self.w == DEFAULT_COORD && self.h == DEFAULT_COORD
    }

    pub(crate) fn from_vec2(v: Vec2) -> Self {
        Self::new(v.x.round() as i32, v.y.round() as i32)
    }

    /// Replaces the specified dimensions of `base`, keeping the others.
    pub(crate) fn apply_to(&self, base: Vec2) -> Vec2 {
        vec2(
            if self.w == DEFAULT_COORD {
                base.x
            } else {
                self.w as f32
            },
            if self.h == DEFAULT_COORD {
                base.y
            } else {
                self.h as f32
            },
        )
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Point {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Point {
    pub(crate) const DEFAULT: Point = Point::new(DEFAULT_COORD, DEFAULT_COORD);

    pub(crate) const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub(crate) const fn is_valid(&self) -> bool {
        self.x != DEFAULT_COORD && self.y != DEFAULT_COORD
    }
}

impl Default for Point {
    fn default() -> Self {
        Point::DEFAULT
    }
}

fn parse_pair(s: &str) -> Option<(i32, i32)> {
    let (a, b) = s.split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

/// `"w,h"`; anything unparsable is the default size.
pub(crate) fn string_to_size(s: &str) -> Size {
    parse_pair(s)
        .map(|(w, h)| Size::new(w, h))
        .unwrap_or(Size::DEFAULT)
}

pub(crate) fn size_to_string(size: Size) -> String {
    format!("{},{}", size.w, size.h)
}

pub(crate) fn string_to_point(s: &str) -> Point {
    parse_pair(s)
        .map(|(x, y)| Point::new(x, y))
        .unwrap_or(Point::DEFAULT)
}

pub(crate) fn point_to_string(point: Point) -> String {
    format!("{},{}", point.x, point.y)
}

/// `"r,g,b"` or `"#rrggbb"`. Named system colours are not resolved here.
pub(crate) fn string_to_colour(s: &str) -> Option<Color32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let v = u32::from_str_radix(hex, 16).ok()?;
        return Some(Color32::from_rgb((v >> 16) as u8, (v >> 8) as u8, v as u8));
    }
    let parts: Vec<u8> = s
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color32::from_rgb(*r, *g, *b)),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FontSpec {
    pub(crate) face: String,
    pub(crate) point_size: f32,
    pub(crate) italic: bool,
    pub(crate) bold: bool,
    pub(crate) underlined: bool,
}

// wx numeric font constants as they appear in stored values
const FONT_STYLE_ITALIC: i32 = 93;
const FONT_WEIGHT_BOLD: i32 = 92;

/// `"face,style,weight,size,family,underlined"`; a missing or `-1` size
/// falls back to 9pt.
pub(crate) fn string_to_font(s: &str) -> Option<FontSpec> {
    let fields: Vec<&str> = s.split(',').map(str::trim).collect();
    if fields.len() < 4 {
        return None;
    }
    let num = |i: usize| fields.get(i).and_then(|f| f.parse::<i32>().ok());
    let size = num(3).filter(|&v| v > 0).unwrap_or(9);
    Some(FontSpec {
        face: fields[0].to_string(),
        point_size: size as f32,
        italic: num(1) == Some(FONT_STYLE_ITALIC),
        bold: num(2) == Some(FONT_WEIGHT_BOLD),
        underlined: num(5).unwrap_or(0) != 0,
    })
}

/// `"Load From File; path"` style values; returns the path part.
pub(crate) fn string_to_bitmap(s: &str) -> Option<String> {
    let path = match s.split_once(';') {
        Some((_, path)) => path.trim(),
        None => s.trim(),
    };
    (!path.is_empty()).then(|| path.to_string())
}

pub(crate) mod flags {
    pub(crate) const WX_HORIZONTAL: i64 = 0x0004;
    pub(crate) const WX_VERTICAL: i64 = 0x0008;
    pub(crate) const WX_LEFT: i64 = 0x0010;
    pub(crate) const WX_RIGHT: i64 = 0x0020;
    pub(crate) const WX_TOP: i64 = 0x0040;
    pub(crate) const WX_BOTTOM: i64 = 0x0080;
    pub(crate) const WX_ALL: i64 = WX_LEFT | WX_RIGHT | WX_TOP | WX_BOTTOM;
    pub(crate) const WX_EXPAND: i64 = 0x2000;
    pub(crate) const WX_ALIGN_CENTER_HORIZONTAL: i64 = 0x0100;
    pub(crate) const WX_ALIGN_RIGHT: i64 = 0x0200;
    pub(crate) const WX_ALIGN_BOTTOM: i64 = 0x0400;
    pub(crate) const WX_ALIGN_CENTER_VERTICAL: i64 = 0x0800;
    pub(crate) const WX_ALIGN_CENTER: i64 = WX_ALIGN_CENTER_HORIZONTAL | WX_ALIGN_CENTER_VERTICAL;

    pub(crate) const WX_CAPTION: i64 = 0x2000_0000;
    pub(crate) const WX_CLOSE_BOX: i64 = 0x1000;
    pub(crate) const WX_MAXIMIZE_BOX: i64 = 0x0200;
    pub(crate) const WX_MINIMIZE_BOX: i64 = 0x0400;
    pub(crate) const WX_SYSTEM_MENU: i64 = 0x0800;
    pub(crate) const WX_RESIZE_BORDER: i64 = 0x0040;
    pub(crate) const WX_DEFAULT_FRAME_STYLE: i64 =
        WX_SYSTEM_MENU | WX_RESIZE_BORDER | WX_MINIMIZE_BOX | WX_MAXIMIZE_BOX | WX_CLOSE_BOX | WX_CAPTION;
    pub(crate) const WX_DEFAULT_DIALOG_STYLE: i64 = WX_CAPTION | WX_SYSTEM_MENU | WX_CLOSE_BOX;

    pub(crate) const WX_TB_HORIZONTAL: i64 = WX_HORIZONTAL;
    pub(crate) const WX_TB_VERTICAL: i64 = WX_VERTICAL;

    pub(crate) const WX_ITEM_SEPARATOR: i64 = -1;
    pub(crate) const WX_ITEM_NORMAL: i64 = 0;
    pub(crate) const WX_ITEM_CHECK: i64 = 1;
    pub(crate) const WX_ITEM_RADIO: i64 = 2;

    pub(crate) const WX_WS_EX_VALIDATE_RECURSIVELY: i64 = 0x0002;
    pub(crate) const WX_WIZARD_EX_HELPBUTTON: i64 = 0x0010;

    const NAMES: &[(&str, i64)] = &[
        ("wxHORIZONTAL", WX_HORIZONTAL),
        ("wxVERTICAL", WX_VERTICAL),
        ("wxLEFT", WX_LEFT),
        ("wxRIGHT", WX_RIGHT),
        ("wxTOP", WX_TOP),
        ("wxUP", WX_TOP),
        ("wxBOTTOM", WX_BOTTOM),
        ("wxDOWN", WX_BOTTOM),
        ("wxALL", WX_ALL),
        ("wxEXPAND", WX_EXPAND),
        ("wxGROW", WX_EXPAND),
        ("wxALIGN_CENTER_HORIZONTAL", WX_ALIGN_CENTER_HORIZONTAL),
        ("wxALIGN_RIGHT", WX_ALIGN_RIGHT),
        ("wxALIGN_BOTTOM", WX_ALIGN_BOTTOM),
        ("wxALIGN_CENTER_VERTICAL", WX_ALIGN_CENTER_VERTICAL),
        ("wxALIGN_CENTER", WX_ALIGN_CENTER),
        ("wxALIGN_CENTRE", WX_ALIGN_CENTER),
        ("wxALIGN_LEFT", 0),
        ("wxALIGN_TOP", 0),
        ("wxCAPTION", WX_CAPTION),
        ("wxCLOSE_BOX", WX_CLOSE_BOX),
        ("wxMAXIMIZE_BOX", WX_MAXIMIZE_BOX),
        ("wxMINIMIZE_BOX", WX_MINIMIZE_BOX),
        ("wxSYSTEM_MENU", WX_SYSTEM_MENU),
        ("wxRESIZE_BORDER", WX_RESIZE_BORDER),
        ("wxDEFAULT_FRAME_STYLE", WX_DEFAULT_FRAME_STYLE),
        ("wxDEFAULT_DIALOG_STYLE", WX_DEFAULT_DIALOG_STYLE),
        ("wxTB_HORIZONTAL", WX_TB_HORIZONTAL),
        ("wxTB_VERTICAL", WX_TB_VERTICAL),
        ("wxITEM_SEPARATOR", WX_ITEM_SEPARATOR),
        ("wxITEM_NORMAL", WX_ITEM_NORMAL),
        ("wxITEM_CHECK", WX_ITEM_CHECK),
        ("wxITEM_RADIO", WX_ITEM_RADIO),
        ("wxWS_EX_VALIDATE_RECURSIVELY", WX_WS_EX_VALIDATE_RECURSIVELY),
        ("wxWIZARD_EX_HELPBUTTON", WX_WIZARD_EX_HELPBUTTON),
    ];

    pub(crate) fn value_of(name: &str) -> Option<i64> {
        NAMES.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

/// Integer literal, or `|`-joined flag names. Unknown names contribute 0.
pub(crate) fn string_to_int(s: &str) -> i64 {
    let s = s.trim();
    if s.is_empty() {
        return 0;
    }
    if let Ok(v) = s.parse::<i64>() {
        return v;
    }
    s.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .ok()
                .or_else(|| flags::value_of(part))
                .unwrap_or(0)
        })
        .fold(0, |acc, v| acc | v)
}

/// True when the `|`-joined value names `flag` literally.
pub(crate) fn flag_list_contains(s: &str, flag: &str) -> bool {
    s.split('|').any(|part| part.trim() == flag)
}
