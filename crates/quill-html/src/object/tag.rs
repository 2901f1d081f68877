//! Known tag kinds and their static metadata.

use std::ops::{BitOr, BitOrAssign};
use std::sync::LazyLock;

use quill_common::pair_table::PairTable;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Structural class bits of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TagFlags(u8);

impl TagFlags {
    /// No bits.
    pub const NONE: Self = Self(0);
    /// Block-level element.
    pub const BLOCK: Self = Self(0x01);
    /// Table cell (`td`, `th`).
    pub const TD: Self = Self(0x02);
    /// Table row.
    pub const TR: Self = Self(0x04);
    /// Table.
    pub const TABLE: Self = Self(0x08);
    /// List item.
    pub const LI: Self = Self(0x10);
    /// Definition term.
    pub const DT: Self = Self(0x20);
    /// Definition description.
    pub const DD: Self = Self(0x40);
    /// Table section (`thead`, `tbody`, `tfoot`).
    pub const TSECTION: Self = Self(0x80);

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for TagFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

impl BitOrAssign for TagFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// How the body of a tag is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BodyMode {
    /// Markup, tokenized as usual.
    Normal,
    /// Verbatim text kept line by line (`pre`).
    Lines,
    /// Verbatim text kept as one word (`script`).
    Raw,
}

/// Effect of a tag on word concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum WordBreak {
    /// Inline: text on both sides may form one word.
    Join,
    /// Block boundary: a virtual space separates the text on both sides.
    Space,
    /// Inline object: the text on both sides stays separate, without space.
    Reset,
}

/// Static metadata of a [`TagKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo {
    /// Structural class of the tag.
    pub flags: TagFlags,
    /// Flags of incoming tags that implicitly close an open instance.
    pub closed_by: TagFlags,
    /// The tag never has a body.
    pub void: bool,
    /// How the body is read.
    pub body_mode: BodyMode,
    /// Effect on word concatenation.
    pub word_break: WordBreak,
}

impl TagInfo {
    const INLINE: Self = Self {
        flags: TagFlags::NONE,
        closed_by: TagFlags::NONE,
        void: false,
        body_mode: BodyMode::Normal,
        word_break: WordBreak::Join,
    };

    const BLOCK: Self = Self {
        flags: TagFlags::BLOCK,
        word_break: WordBreak::Space,
        ..Self::INLINE
    };

    const fn block(flags: TagFlags, closed_by: TagFlags) -> Self {
        Self {
            flags: TagFlags::BLOCK.or(flags),
            closed_by,
            ..Self::BLOCK
        }
    }

    const fn void(word_break: WordBreak) -> Self {
        Self {
            void: true,
            word_break,
            ..Self::INLINE
        }
    }

    const fn opaque(body_mode: BodyMode, flags: TagFlags, word_break: WordBreak) -> Self {
        Self {
            flags,
            body_mode,
            word_break,
            ..Self::INLINE
        }
    }
}

/// The tags the HTML flavour knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum TagKind {
    A,
    Abbr,
    Address,
    B,
    Base,
    Big,
    Blockquote,
    Body,
    Br,
    Caption,
    Center,
    Cite,
    Code,
    Col,
    Dd,
    Dfn,
    Div,
    Dl,
    Dt,
    Em,
    Font,
    Form,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Head,
    Hr,
    Html,
    I,
    Img,
    Input,
    Kbd,
    Li,
    Link,
    Listing,
    Meta,
    Ol,
    P,
    Pre,
    S,
    Samp,
    Script,
    Small,
    Span,
    Strike,
    Strong,
    Style,
    Sub,
    Sup,
    Table,
    Tbody,
    Td,
    Textarea,
    Tfoot,
    Th,
    Thead,
    Title,
    Tr,
    Tt,
    U,
    Ul,
    Var,
    Xmp,
    /// A tag missing from the tag table; its name is kept on the node.
    Unknown,
}

impl TagKind {
    /// Static metadata of this kind.
    #[must_use]
    pub const fn info(self) -> TagInfo {
        match self {
            Self::Address
            | Self::Blockquote
            | Self::Body
            | Self::Caption
            | Self::Center
            | Self::Div
            | Self::Dl
            | Self::Form
            | Self::H1
            | Self::H2
            | Self::H3
            | Self::H4
            | Self::H5
            | Self::H6
            | Self::Head
            | Self::Html
            | Self::Ol
            | Self::Ul => TagInfo::BLOCK,
            Self::Title => TagInfo {
                word_break: WordBreak::Space,
                ..TagInfo::INLINE
            },
            Self::P => TagInfo::block(TagFlags::NONE, TagFlags::BLOCK),
            Self::Li => TagInfo::block(TagFlags::LI, TagFlags::LI),
            Self::Dt => TagInfo::block(TagFlags::DT, TagFlags::DT.or(TagFlags::DD)),
            Self::Dd => TagInfo::block(TagFlags::DD, TagFlags::DT.or(TagFlags::DD)),
            Self::Table => TagInfo::block(TagFlags::TABLE, TagFlags::NONE),
            Self::Thead | Self::Tbody | Self::Tfoot => {
                TagInfo::block(TagFlags::TSECTION, TagFlags::TSECTION)
            }
            Self::Tr => TagInfo::block(TagFlags::TR, TagFlags::TR.or(TagFlags::TSECTION)),
            Self::Td | Self::Th => TagInfo::block(
                TagFlags::TD,
                TagFlags::TD.or(TagFlags::TR).or(TagFlags::TSECTION),
            ),
            Self::Hr => TagInfo {
                flags: TagFlags::BLOCK,
                ..TagInfo::void(WordBreak::Space)
            },
            Self::Br => TagInfo::void(WordBreak::Space),
            Self::Img | Self::Input | Self::Col | Self::Meta | Self::Link | Self::Base => {
                TagInfo::void(WordBreak::Reset)
            }
            Self::Pre | Self::Listing | Self::Xmp => {
                TagInfo::opaque(BodyMode::Lines, TagFlags::BLOCK, WordBreak::Space)
            }
            Self::Script | Self::Style | Self::Textarea => {
                TagInfo::opaque(BodyMode::Raw, TagFlags::NONE, WordBreak::Reset)
            }
            Self::A
            | Self::Abbr
            | Self::B
            | Self::Big
            | Self::Cite
            | Self::Code
            | Self::Dfn
            | Self::Em
            | Self::Font
            | Self::I
            | Self::Kbd
            | Self::S
            | Self::Samp
            | Self::Small
            | Self::Span
            | Self::Strike
            | Self::Strong
            | Self::Sub
            | Self::Sup
            | Self::Tt
            | Self::U
            | Self::Var
            | Self::Unknown => TagInfo::INLINE,
        }
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Tag name → kind table used when creating tag nodes.
pub type TagTable<'a> = PairTable<'a, TagKind>;

static DEFAULT_TAGS: LazyLock<TagTable<'static>> = LazyLock::new(|| {
    let mut table = TagTable::new();
    for kind in TagKind::iter().filter(|&kind| kind != TagKind::Unknown) {
        table.add(kind.name(), kind);
    }
    table
});

/// The shared tag table holding every [`TagKind`] but `Unknown`.
#[must_use]
pub fn default_tag_table() -> &'static TagTable<'static> {
    &DEFAULT_TAGS
}
