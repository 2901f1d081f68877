//! Typed interpretation of tag attributes.
//!
//! Values arrive with their quotes removed and entities decoded. Values that
//! cannot be interpreted leave the field unset; unknown attributes are
//! ignored.

use core::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::LazyLock;

use quill_common::pair_table::{Entry, PairTable};
use quill_common::scan::{IntFormat, Sign, int_value, signed_int_value};
use quill_common::warning::warn_once;
use quill_css::{Declaration, Property, parse_inline};
use strum_macros::{Display, IntoStaticStr};

/// A `width`/`height` style length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// Absolute size in pixels.
    Pixels(u32),
    /// Percentage of the available size.
    Percent(u32),
}

impl Length {
    /// Parse `120` or `50%`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (number, used) = int_value(value, IntFormat::DECIMAL)?;
        let number = u32::try_from(number).ok()?;
        match &value[used..] {
            "%" => Some(Self::Percent(number)),
            "" | "px" => Some(Self::Pixels(number)),
            _ => None,
        }
    }

    /// Size in pixels given the available size.
    #[must_use]
    pub fn resolve(self, available: u32) -> u32 {
        match self {
            Self::Pixels(pixels) => pixels,
            Self::Percent(percent) => {
                u32::try_from(u64::from(available) * u64::from(percent) / 100).unwrap_or(u32::MAX)
            }
        }
    }
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Build from components.
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// Red component.
    #[must_use]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green component.
    #[must_use]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue component.
    #[must_use]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Parse `#rgb`, `#rrggbb`, a bare `rrggbb` or a name from `names`
    /// (case-insensitive).
    #[must_use]
    pub fn parse(value: &str, names: &ColorTable<'_>) -> Option<Self> {
        let value = value.trim();
        if let Some(color) = names.find_case(value) {
            return Some(*color);
        }
        let digits = value.strip_prefix('#').unwrap_or(value);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let (number, _) = int_value(digits, IntFormat::HEX)?;
        let hex = u32::try_from(number).ok()?;
        match (digits.len() < value.len(), digits.len()) {
            (true, 3) => {
                let expand = |nibble: u32| (nibble & 0xF) * 0x11;
                Some(Self((expand(hex >> 8) << 16) | (expand(hex >> 4) << 8) | expand(hex)))
            }
            (_, 6) => Some(Self(hex)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Color name → value table.
pub type ColorTable<'a> = PairTable<'a, Color>;

static COLOR_NAMES: &[Entry<'static, Color>] = &[
    Entry::new("black", Color(0x00_0000)),
    Entry::new("silver", Color(0xc0_c0c0)),
    Entry::new("gray", Color(0x80_8080)),
    Entry::new("grey", Color(0x80_8080)),
    Entry::new("white", Color(0xff_ffff)),
    Entry::new("maroon", Color(0x80_0000)),
    Entry::new("red", Color(0xff_0000)),
    Entry::new("purple", Color(0x80_0080)),
    Entry::new("fuchsia", Color(0xff_00ff)),
    Entry::new("magenta", Color(0xff_00ff)),
    Entry::new("green", Color(0x00_8000)),
    Entry::new("lime", Color(0x00_ff00)),
    Entry::new("olive", Color(0x80_8000)),
    Entry::new("yellow", Color(0xff_ff00)),
    Entry::new("navy", Color(0x00_0080)),
    Entry::new("blue", Color(0x00_00ff)),
    Entry::new("teal", Color(0x00_8080)),
    Entry::new("aqua", Color(0x00_ffff)),
    Entry::new("cyan", Color(0x00_ffff)),
    Entry::new("orange", Color(0xff_a500)),
];

static DEFAULT_COLORS: LazyLock<ColorTable<'static>> =
    LazyLock::new(|| ColorTable::from_static(COLOR_NAMES));

/// The shared table of named colors.
#[must_use]
pub fn default_color_table() -> &'static ColorTable<'static> {
    &DEFAULT_COLORS
}

/// Values of `align` and `valign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
    Top,
    Middle,
    Bottom,
    Baseline,
}

static ALIGN_NAMES: &[Entry<'static, Align>] = &[
    Entry::new("left", Align::Left),
    Entry::new("center", Align::Center),
    Entry::new("middle", Align::Middle),
    Entry::new("right", Align::Right),
    Entry::new("justify", Align::Justify),
    Entry::new("top", Align::Top),
    Entry::new("bottom", Align::Bottom),
    Entry::new("baseline", Align::Baseline),
];

static ALIGNS: PairTable<'static, Align> = PairTable::from_static(ALIGN_NAMES);

impl Align {
    /// Case-insensitive lookup.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        ALIGNS.find_case(value.trim()).copied()
    }
}

/// Boolean attributes present on a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttrFlags(u16);

impl AttrFlags {
    /// `nowrap`
    pub const NOWRAP: Self = Self(0x01);
    /// `checked`
    pub const CHECKED: Self = Self(0x02);
    /// `selected`
    pub const SELECTED: Self = Self(0x04);
    /// `disabled`
    pub const DISABLED: Self = Self(0x08);
    /// `noshade`
    pub const NOSHADE: Self = Self(0x10);
    /// `compact`
    pub const COMPACT: Self = Self(0x20);
    /// `multiple`
    pub const MULTIPLE: Self = Self(0x40);
    /// `readonly`
    pub const READONLY: Self = Self(0x80);

    /// The flag for a boolean attribute name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let flag = match name.to_ascii_lowercase().as_str() {
            "nowrap" => Self::NOWRAP,
            "checked" => Self::CHECKED,
            "selected" => Self::SELECTED,
            "disabled" => Self::DISABLED,
            "noshade" => Self::NOSHADE,
            "compact" => Self::COMPACT,
            "multiple" => Self::MULTIPLE,
            "readonly" => Self::READONLY,
            _ => return None,
        };
        Some(flag)
    }

    /// Whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AttrFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AttrFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A `<font size>`: absolute (`3`) or relative to the current size (`+1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSize {
    /// The number as written, without its sign.
    pub value: i64,
    /// `Unsigned` for absolute sizes.
    pub sign: Sign,
}

impl FontSize {
    /// Absolute size given the current one.
    #[must_use]
    pub const fn resolve(self, current: i64) -> i64 {
        match self.sign {
            Sign::Unsigned => self.value,
            Sign::Minus | Sign::Plus => current + self.sign.apply(self.value),
        }
    }
}

/// Interpreted attributes of an HTML tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagAttributes {
    /// `id`
    pub id: Option<String>,
    /// `class`
    pub class: Option<String>,
    /// `title`
    pub title: Option<String>,
    /// `href`
    pub href: Option<String>,
    /// `name`
    pub name: Option<String>,
    /// `src`
    pub src: Option<String>,
    /// `alt`
    pub alt: Option<String>,
    /// `face`
    pub face: Option<String>,
    /// `background` image reference.
    pub background: Option<String>,
    /// `type` of an input.
    pub input_type: Option<String>,
    /// `value` of an input.
    pub value: Option<String>,
    /// `align`
    pub align: Option<Align>,
    /// `valign`
    pub valign: Option<Align>,
    /// `width`
    pub width: Option<Length>,
    /// `height`
    pub height: Option<Length>,
    /// `color`
    pub color: Option<Color>,
    /// `bgcolor`
    pub bgcolor: Option<Color>,
    /// `text` color of a body.
    pub text: Option<Color>,
    /// `link` color of a body.
    pub link: Option<Color>,
    /// `border`
    pub border: Option<i64>,
    /// `cellpadding`
    pub cellpadding: Option<i64>,
    /// `cellspacing`
    pub cellspacing: Option<i64>,
    /// `colspan`
    pub colspan: Option<i64>,
    /// `rowspan`
    pub rowspan: Option<i64>,
    /// `start` of an ordered list.
    pub start: Option<i64>,
    /// `size` of a font.
    pub size: Option<FontSize>,
    /// Declarations of the `style` attribute.
    pub style: Vec<Declaration>,
    /// Boolean attributes.
    pub flags: AttrFlags,
}

impl TagAttributes {
    /// Record one attribute. Returns `false` when the name is not one this
    /// model interprets.
    pub fn apply(&mut self, name: &str, value: Option<&str>, colors: &ColorTable<'_>) -> bool {
        if let Some(flag) = AttrFlags::from_name(name) {
            self.flags |= flag;
            return true;
        }
        let Some(value) = value else {
            return false;
        };

        let owned = || Some(value.to_string());
        let integer = || int_value(value.trim(), IntFormat::DECIMAL).map(|(n, _)| n);
        match name.to_ascii_lowercase().as_str() {
            "id" => self.id = owned(),
            "class" => self.class = owned(),
            "title" => self.title = owned(),
            "href" => self.href = owned(),
            "name" => self.name = owned(),
            "src" => self.src = owned(),
            "alt" => self.alt = owned(),
            "face" => self.face = owned(),
            "background" => self.background = owned(),
            "type" => self.input_type = owned(),
            "value" => self.value = owned(),
            "align" => self.align = Align::parse(value),
            "valign" => self.valign = Align::parse(value),
            "width" => self.width = Length::parse(value),
            "height" => self.height = Length::parse(value),
            "color" => self.color = Color::parse(value, colors),
            "bgcolor" => self.bgcolor = Color::parse(value, colors),
            "text" => self.text = Color::parse(value, colors),
            "link" => self.link = Color::parse(value, colors),
            "border" => self.border = integer(),
            "cellpadding" => self.cellpadding = integer(),
            "cellspacing" => self.cellspacing = integer(),
            "colspan" => self.colspan = integer(),
            "rowspan" => self.rowspan = integer(),
            "start" => self.start = integer(),
            "size" => {
                self.size = signed_int_value(value.trim()).map(|(value, sign, _)| FontSize { value, sign });
            }
            "style" => self.style = parse_style(value),
            _ => return false,
        }
        true
    }

    /// The style declaration named `property`, last one winning.
    #[must_use]
    pub fn style_value(&self, property: &str) -> Option<&Declaration> {
        self.style
            .iter()
            .rev()
            .find(|declaration| declaration.name.eq_ignore_ascii_case(property))
    }
}

/// Declarations of a `style` attribute, keeping those read before an error.
fn parse_style(value: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut property = Property::new();
    if let Err(error) = parse_inline(value, &mut property, |p| {
        declarations.push(Declaration::from_property(p));
    }) {
        warn_once("HTML Parser", &format!("malformed style=\"{value}\": {error}"));
    }
    declarations
}
