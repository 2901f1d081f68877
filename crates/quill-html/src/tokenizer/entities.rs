//! Character entity table and translation.
//!
//! Names are stored without the leading `&` and with the terminating `;`.
//! A handful of legacy names are also registered without `;`; they sit at the
//! front of the table so every `;` form is tried before them.
//!
//! Numeric references (`&#65;`, `&#x41;`) are decoded directly and need the
//! terminating `;`. Anything that does not decode is left in the text as is.

use std::sync::LazyLock;

use quill_common::pair_table::{Entry, PairTable};
use quill_common::scan::{IntFormat, int_value};

/// Longest reference [`EntityTable::translate_in_place`] looks at.
const MAX_REFERENCE_LEN: usize = 32;

/// Named references known to every parser.
static DEFAULT_ENTITIES: &[Entry<'static, &'static str>] = &[
    // Legacy forms without `;`. Searched last.
    Entry::new("amp", "&"),
    Entry::new("lt", "<"),
    Entry::new("gt", ">"),
    Entry::new("quot", "\""),
    Entry::new("nbsp", "\u{00A0}"),
    Entry::new("copy", "\u{00A9}"),
    Entry::new("reg", "\u{00AE}"),
    Entry::new("not", "\u{00AC}"),
    Entry::new("shy", "\u{00AD}"),
    Entry::new("deg", "\u{00B0}"),
    Entry::new("plusmn", "\u{00B1}"),
    Entry::new("micro", "\u{00B5}"),
    Entry::new("para", "\u{00B6}"),
    Entry::new("middot", "\u{00B7}"),
    Entry::new("frac12", "\u{00BD}"),
    Entry::new("frac14", "\u{00BC}"),
    Entry::new("frac34", "\u{00BE}"),
    Entry::new("sect", "\u{00A7}"),
    Entry::new("times", "\u{00D7}"),
    Entry::new("divide", "\u{00F7}"),
    Entry::new("laquo", "\u{00AB}"),
    Entry::new("raquo", "\u{00BB}"),
    Entry::new("iexcl", "\u{00A1}"),
    Entry::new("iquest", "\u{00BF}"),
    Entry::new("cent", "\u{00A2}"),
    Entry::new("pound", "\u{00A3}"),
    Entry::new("yen", "\u{00A5}"),
    Entry::new("ordf", "\u{00AA}"),
    Entry::new("ordm", "\u{00BA}"),
    Entry::new("sup1", "\u{00B9}"),
    Entry::new("sup2", "\u{00B2}"),
    Entry::new("sup3", "\u{00B3}"),
    Entry::new("acute", "\u{00B4}"),
    Entry::new("cedil", "\u{00B8}"),
    Entry::new("uml", "\u{00A8}"),
    Entry::new("macr", "\u{00AF}"),
    Entry::new("brvbar", "\u{00A6}"),
    Entry::new("curren", "\u{00A4}"),
    Entry::new("AElig", "\u{00C6}"),
    Entry::new("Aacute", "\u{00C1}"),
    Entry::new("Acirc", "\u{00C2}"),
    Entry::new("Agrave", "\u{00C0}"),
    Entry::new("Aring", "\u{00C5}"),
    Entry::new("Atilde", "\u{00C3}"),
    Entry::new("Auml", "\u{00C4}"),
    Entry::new("Ccedil", "\u{00C7}"),
    Entry::new("ETH", "\u{00D0}"),
    Entry::new("Eacute", "\u{00C9}"),
    Entry::new("Ecirc", "\u{00CA}"),
    Entry::new("Egrave", "\u{00C8}"),
    Entry::new("Euml", "\u{00CB}"),
    Entry::new("Iacute", "\u{00CD}"),
    Entry::new("Icirc", "\u{00CE}"),
    Entry::new("Igrave", "\u{00CC}"),
    Entry::new("Iuml", "\u{00CF}"),
    Entry::new("Ntilde", "\u{00D1}"),
    Entry::new("Oacute", "\u{00D3}"),
    Entry::new("Ocirc", "\u{00D4}"),
    Entry::new("Ograve", "\u{00D2}"),
    Entry::new("Oslash", "\u{00D8}"),
    Entry::new("Otilde", "\u{00D5}"),
    Entry::new("Ouml", "\u{00D6}"),
    Entry::new("THORN", "\u{00DE}"),
    Entry::new("Uacute", "\u{00DA}"),
    Entry::new("Ucirc", "\u{00DB}"),
    Entry::new("Ugrave", "\u{00D9}"),
    Entry::new("Uuml", "\u{00DC}"),
    Entry::new("Yacute", "\u{00DD}"),
    Entry::new("aacute", "\u{00E1}"),
    Entry::new("acirc", "\u{00E2}"),
    Entry::new("aelig", "\u{00E6}"),
    Entry::new("agrave", "\u{00E0}"),
    Entry::new("aring", "\u{00E5}"),
    Entry::new("atilde", "\u{00E3}"),
    Entry::new("auml", "\u{00E4}"),
    Entry::new("ccedil", "\u{00E7}"),
    Entry::new("eacute", "\u{00E9}"),
    Entry::new("ecirc", "\u{00EA}"),
    Entry::new("egrave", "\u{00E8}"),
    Entry::new("eth", "\u{00F0}"),
    Entry::new("euml", "\u{00EB}"),
    Entry::new("iacute", "\u{00ED}"),
    Entry::new("icirc", "\u{00EE}"),
    Entry::new("igrave", "\u{00EC}"),
    Entry::new("iuml", "\u{00EF}"),
    Entry::new("ntilde", "\u{00F1}"),
    Entry::new("oacute", "\u{00F3}"),
    Entry::new("ocirc", "\u{00F4}"),
    Entry::new("ograve", "\u{00F2}"),
    Entry::new("oslash", "\u{00F8}"),
    Entry::new("otilde", "\u{00F5}"),
    Entry::new("ouml", "\u{00F6}"),
    Entry::new("szlig", "\u{00DF}"),
    Entry::new("thorn", "\u{00FE}"),
    Entry::new("uacute", "\u{00FA}"),
    Entry::new("ucirc", "\u{00FB}"),
    Entry::new("ugrave", "\u{00F9}"),
    Entry::new("uuml", "\u{00FC}"),
    Entry::new("yacute", "\u{00FD}"),
    Entry::new("yuml", "\u{00FF}"),
    Entry::new("apos;", "'"),
    Entry::new("quot;", "\""),
    Entry::new("amp;", "&"),
    Entry::new("lt;", "<"),
    Entry::new("gt;", ">"),
    Entry::new("nbsp;", "\u{00A0}"),
    Entry::new("iexcl;", "\u{00A1}"),
    Entry::new("cent;", "\u{00A2}"),
    Entry::new("pound;", "\u{00A3}"),
    Entry::new("curren;", "\u{00A4}"),
    Entry::new("yen;", "\u{00A5}"),
    Entry::new("brvbar;", "\u{00A6}"),
    Entry::new("sect;", "\u{00A7}"),
    Entry::new("uml;", "\u{00A8}"),
    Entry::new("copy;", "\u{00A9}"),
    Entry::new("ordf;", "\u{00AA}"),
    Entry::new("laquo;", "\u{00AB}"),
    Entry::new("not;", "\u{00AC}"),
    Entry::new("shy;", "\u{00AD}"),
    Entry::new("reg;", "\u{00AE}"),
    Entry::new("macr;", "\u{00AF}"),
    Entry::new("deg;", "\u{00B0}"),
    Entry::new("plusmn;", "\u{00B1}"),
    Entry::new("sup2;", "\u{00B2}"),
    Entry::new("sup3;", "\u{00B3}"),
    Entry::new("acute;", "\u{00B4}"),
    Entry::new("micro;", "\u{00B5}"),
    Entry::new("para;", "\u{00B6}"),
    Entry::new("middot;", "\u{00B7}"),
    Entry::new("cedil;", "\u{00B8}"),
    Entry::new("sup1;", "\u{00B9}"),
    Entry::new("ordm;", "\u{00BA}"),
    Entry::new("raquo;", "\u{00BB}"),
    Entry::new("frac14;", "\u{00BC}"),
    Entry::new("frac12;", "\u{00BD}"),
    Entry::new("frac34;", "\u{00BE}"),
    Entry::new("iquest;", "\u{00BF}"),
    Entry::new("Agrave;", "\u{00C0}"),
    Entry::new("Aacute;", "\u{00C1}"),
    Entry::new("Acirc;", "\u{00C2}"),
    Entry::new("Atilde;", "\u{00C3}"),
    Entry::new("Auml;", "\u{00C4}"),
    Entry::new("Aring;", "\u{00C5}"),
    Entry::new("AElig;", "\u{00C6}"),
    Entry::new("Ccedil;", "\u{00C7}"),
    Entry::new("Egrave;", "\u{00C8}"),
    Entry::new("Eacute;", "\u{00C9}"),
    Entry::new("Ecirc;", "\u{00CA}"),
    Entry::new("Euml;", "\u{00CB}"),
    Entry::new("Igrave;", "\u{00CC}"),
    Entry::new("Iacute;", "\u{00CD}"),
    Entry::new("Icirc;", "\u{00CE}"),
    Entry::new("Iuml;", "\u{00CF}"),
    Entry::new("ETH;", "\u{00D0}"),
    Entry::new("Ntilde;", "\u{00D1}"),
    Entry::new("Ograve;", "\u{00D2}"),
    Entry::new("Oacute;", "\u{00D3}"),
    Entry::new("Ocirc;", "\u{00D4}"),
    Entry::new("Otilde;", "\u{00D5}"),
    Entry::new("Ouml;", "\u{00D6}"),
    Entry::new("times;", "\u{00D7}"),
    Entry::new("Oslash;", "\u{00D8}"),
    Entry::new("Ugrave;", "\u{00D9}"),
    Entry::new("Uacute;", "\u{00DA}"),
    Entry::new("Ucirc;", "\u{00DB}"),
    Entry::new("Uuml;", "\u{00DC}"),
    Entry::new("Yacute;", "\u{00DD}"),
    Entry::new("THORN;", "\u{00DE}"),
    Entry::new("szlig;", "\u{00DF}"),
    Entry::new("agrave;", "\u{00E0}"),
    Entry::new("aacute;", "\u{00E1}"),
    Entry::new("acirc;", "\u{00E2}"),
    Entry::new("atilde;", "\u{00E3}"),
    Entry::new("auml;", "\u{00E4}"),
    Entry::new("aring;", "\u{00E5}"),
    Entry::new("aelig;", "\u{00E6}"),
    Entry::new("ccedil;", "\u{00E7}"),
    Entry::new("egrave;", "\u{00E8}"),
    Entry::new("eacute;", "\u{00E9}"),
    Entry::new("ecirc;", "\u{00EA}"),
    Entry::new("euml;", "\u{00EB}"),
    Entry::new("igrave;", "\u{00EC}"),
    Entry::new("iacute;", "\u{00ED}"),
    Entry::new("icirc;", "\u{00EE}"),
    Entry::new("iuml;", "\u{00EF}"),
    Entry::new("eth;", "\u{00F0}"),
    Entry::new("ntilde;", "\u{00F1}"),
    Entry::new("ograve;", "\u{00F2}"),
    Entry::new("oacute;", "\u{00F3}"),
    Entry::new("ocirc;", "\u{00F4}"),
    Entry::new("otilde;", "\u{00F5}"),
    Entry::new("ouml;", "\u{00F6}"),
    Entry::new("divide;", "\u{00F7}"),
    Entry::new("oslash;", "\u{00F8}"),
    Entry::new("ugrave;", "\u{00F9}"),
    Entry::new("uacute;", "\u{00FA}"),
    Entry::new("ucirc;", "\u{00FB}"),
    Entry::new("uuml;", "\u{00FC}"),
    Entry::new("yacute;", "\u{00FD}"),
    Entry::new("thorn;", "\u{00FE}"),
    Entry::new("yuml;", "\u{00FF}"),
    Entry::new("OElig;", "\u{0152}"),
    Entry::new("oelig;", "\u{0153}"),
    Entry::new("Scaron;", "\u{0160}"),
    Entry::new("scaron;", "\u{0161}"),
    Entry::new("Yuml;", "\u{0178}"),
    Entry::new("fnof;", "\u{0192}"),
    Entry::new("circ;", "\u{02C6}"),
    Entry::new("tilde;", "\u{02DC}"),
    Entry::new("Alpha;", "\u{0391}"),
    Entry::new("Beta;", "\u{0392}"),
    Entry::new("Gamma;", "\u{0393}"),
    Entry::new("Delta;", "\u{0394}"),
    Entry::new("Epsilon;", "\u{0395}"),
    Entry::new("Zeta;", "\u{0396}"),
    Entry::new("Eta;", "\u{0397}"),
    Entry::new("Theta;", "\u{0398}"),
    Entry::new("Iota;", "\u{0399}"),
    Entry::new("Kappa;", "\u{039A}"),
    Entry::new("Lambda;", "\u{039B}"),
    Entry::new("Mu;", "\u{039C}"),
    Entry::new("Nu;", "\u{039D}"),
    Entry::new("Xi;", "\u{039E}"),
    Entry::new("Omicron;", "\u{039F}"),
    Entry::new("Pi;", "\u{03A0}"),
    Entry::new("Rho;", "\u{03A1}"),
    Entry::new("Sigma;", "\u{03A3}"),
    Entry::new("Tau;", "\u{03A4}"),
    Entry::new("Upsilon;", "\u{03A5}"),
    Entry::new("Phi;", "\u{03A6}"),
    Entry::new("Chi;", "\u{03A7}"),
    Entry::new("Psi;", "\u{03A8}"),
    Entry::new("Omega;", "\u{03A9}"),
    Entry::new("alpha;", "\u{03B1}"),
    Entry::new("beta;", "\u{03B2}"),
    Entry::new("gamma;", "\u{03B3}"),
    Entry::new("delta;", "\u{03B4}"),
    Entry::new("epsilon;", "\u{03B5}"),
    Entry::new("zeta;", "\u{03B6}"),
    Entry::new("eta;", "\u{03B7}"),
    Entry::new("theta;", "\u{03B8}"),
    Entry::new("iota;", "\u{03B9}"),
    Entry::new("kappa;", "\u{03BA}"),
    Entry::new("lambda;", "\u{03BB}"),
    Entry::new("mu;", "\u{03BC}"),
    Entry::new("nu;", "\u{03BD}"),
    Entry::new("xi;", "\u{03BE}"),
    Entry::new("omicron;", "\u{03BF}"),
    Entry::new("pi;", "\u{03C0}"),
    Entry::new("rho;", "\u{03C1}"),
    Entry::new("sigmaf;", "\u{03C2}"),
    Entry::new("sigma;", "\u{03C3}"),
    Entry::new("tau;", "\u{03C4}"),
    Entry::new("upsilon;", "\u{03C5}"),
    Entry::new("phi;", "\u{03C6}"),
    Entry::new("chi;", "\u{03C7}"),
    Entry::new("psi;", "\u{03C8}"),
    Entry::new("omega;", "\u{03C9}"),
    Entry::new("thetasym;", "\u{03D1}"),
    Entry::new("upsih;", "\u{03D2}"),
    Entry::new("piv;", "\u{03D6}"),
    Entry::new("ensp;", "\u{2002}"),
    Entry::new("emsp;", "\u{2003}"),
    Entry::new("thinsp;", "\u{2009}"),
    Entry::new("zwnj;", "\u{200C}"),
    Entry::new("zwj;", "\u{200D}"),
    Entry::new("lrm;", "\u{200E}"),
    Entry::new("rlm;", "\u{200F}"),
    Entry::new("ndash;", "\u{2013}"),
    Entry::new("mdash;", "\u{2014}"),
    Entry::new("lsquo;", "\u{2018}"),
    Entry::new("rsquo;", "\u{2019}"),
    Entry::new("sbquo;", "\u{201A}"),
    Entry::new("ldquo;", "\u{201C}"),
    Entry::new("rdquo;", "\u{201D}"),
    Entry::new("bdquo;", "\u{201E}"),
    Entry::new("dagger;", "\u{2020}"),
    Entry::new("Dagger;", "\u{2021}"),
    Entry::new("bull;", "\u{2022}"),
    Entry::new("hellip;", "\u{2026}"),
    Entry::new("permil;", "\u{2030}"),
    Entry::new("prime;", "\u{2032}"),
    Entry::new("Prime;", "\u{2033}"),
    Entry::new("lsaquo;", "\u{2039}"),
    Entry::new("rsaquo;", "\u{203A}"),
    Entry::new("oline;", "\u{203E}"),
    Entry::new("frasl;", "\u{2044}"),
    Entry::new("euro;", "\u{20AC}"),
    Entry::new("image;", "\u{2111}"),
    Entry::new("weierp;", "\u{2118}"),
    Entry::new("real;", "\u{211C}"),
    Entry::new("trade;", "\u{2122}"),
    Entry::new("alefsym;", "\u{2135}"),
    Entry::new("larr;", "\u{2190}"),
    Entry::new("uarr;", "\u{2191}"),
    Entry::new("rarr;", "\u{2192}"),
    Entry::new("darr;", "\u{2193}"),
    Entry::new("harr;", "\u{2194}"),
    Entry::new("crarr;", "\u{21B5}"),
    Entry::new("lArr;", "\u{21D0}"),
    Entry::new("uArr;", "\u{21D1}"),
    Entry::new("rArr;", "\u{21D2}"),
    Entry::new("dArr;", "\u{21D3}"),
    Entry::new("hArr;", "\u{21D4}"),
    Entry::new("forall;", "\u{2200}"),
    Entry::new("part;", "\u{2202}"),
    Entry::new("exist;", "\u{2203}"),
    Entry::new("empty;", "\u{2205}"),
    Entry::new("nabla;", "\u{2207}"),
    Entry::new("isin;", "\u{2208}"),
    Entry::new("notin;", "\u{2209}"),
    Entry::new("ni;", "\u{220B}"),
    Entry::new("prod;", "\u{220F}"),
    Entry::new("sum;", "\u{2211}"),
    Entry::new("minus;", "\u{2212}"),
    Entry::new("lowast;", "\u{2217}"),
    Entry::new("radic;", "\u{221A}"),
    Entry::new("prop;", "\u{221D}"),
    Entry::new("infin;", "\u{221E}"),
    Entry::new("ang;", "\u{2220}"),
    Entry::new("and;", "\u{2227}"),
    Entry::new("or;", "\u{2228}"),
    Entry::new("cap;", "\u{2229}"),
    Entry::new("cup;", "\u{222A}"),
    Entry::new("int;", "\u{222B}"),
    Entry::new("there4;", "\u{2234}"),
    Entry::new("sim;", "\u{223C}"),
    Entry::new("cong;", "\u{2245}"),
    Entry::new("asymp;", "\u{2248}"),
    Entry::new("ne;", "\u{2260}"),
    Entry::new("equiv;", "\u{2261}"),
    Entry::new("le;", "\u{2264}"),
    Entry::new("ge;", "\u{2265}"),
    Entry::new("sub;", "\u{2282}"),
    Entry::new("sup;", "\u{2283}"),
    Entry::new("nsub;", "\u{2284}"),
    Entry::new("sube;", "\u{2286}"),
    Entry::new("supe;", "\u{2287}"),
    Entry::new("oplus;", "\u{2295}"),
    Entry::new("otimes;", "\u{2297}"),
    Entry::new("perp;", "\u{22A5}"),
    Entry::new("sdot;", "\u{22C5}"),
    Entry::new("lceil;", "\u{2308}"),
    Entry::new("rceil;", "\u{2309}"),
    Entry::new("lfloor;", "\u{230A}"),
    Entry::new("rfloor;", "\u{230B}"),
    Entry::new("lang;", "\u{2329}"),
    Entry::new("rang;", "\u{232A}"),
    Entry::new("loz;", "\u{25CA}"),
    Entry::new("spades;", "\u{2660}"),
    Entry::new("clubs;", "\u{2663}"),
    Entry::new("hearts;", "\u{2665}"),
    Entry::new("diams;", "\u{2666}"),
];

static DEFAULT_TABLE: LazyLock<EntityTable<'static>> =
    LazyLock::new(|| EntityTable::from_static(DEFAULT_ENTITIES));

/// The shared, read-only default table.
#[must_use]
pub fn default_table() -> &'static EntityTable<'static> {
    &DEFAULT_TABLE
}

/// A decoded character reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// Replacement text of a named reference.
    Named(&'a str),
    /// Scalar value of a numeric reference.
    Char(char),
}

impl Decoded<'_> {
    /// Length of the replacement in UTF-8 bytes.
    #[must_use]
    pub const fn len_utf8(&self) -> usize {
        match self {
            Self::Named(text) => text.len(),
            Self::Char(c) => c.len_utf8(),
        }
    }

    /// Append the replacement to `out`.
    pub fn push_to(&self, out: &mut String) {
        match *self {
            Self::Named(text) => out.push_str(text),
            Self::Char(c) => out.push(c),
        }
    }
}

/// Entity name → replacement text.
#[derive(Debug, Clone, Default)]
pub struct EntityTable<'a> {
    table: PairTable<'a, &'a str>,
}

impl<'a> EntityTable<'a> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: PairTable::new(),
        }
    }

    /// Create a table over a borrowed slice of entries.
    #[must_use]
    pub const fn from_static(entries: &'a [Entry<'a, &'a str>]) -> Self {
        Self {
            table: PairTable::from_static(entries),
        }
    }

    /// Register `name` (`;` included) as `value`. The newest entry wins.
    pub fn add(&mut self, name: &'a str, value: &'a str) {
        self.table.add(name, value);
    }

    /// Replace the newest `name` entry, or add one.
    pub fn replace(&mut self, name: &'a str, value: &'a str) -> Option<&'a str> {
        self.table.replace(name, value)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The underlying pair table.
    #[must_use]
    pub const fn table(&self) -> &PairTable<'a, &'a str> {
        &self.table
    }

    /// Look up the name at the start of `src` (the text after `&`).
    ///
    /// Returns the replacement and the length of the matched name.
    #[must_use]
    pub fn find(&self, src: &str) -> Option<(&'a str, usize)> {
        self.table
            .find_prefix(src.as_bytes())
            .map(|(value, len)| (*value, len))
    }

    /// Decode the reference at the start of `src`, which begins with `&`.
    ///
    /// Returns the replacement and the number of bytes the reference spans,
    /// `&` included. Unknown names, malformed numeric references and values
    /// that are not Unicode scalars give `None`.
    #[must_use]
    pub fn decode_reference(&self, src: &str) -> Option<(Decoded<'a>, usize)> {
        let rest = src.strip_prefix('&')?;
        let Some(number) = rest.strip_prefix('#') else {
            return self
                .find(rest)
                .map(|(value, len)| (Decoded::Named(value), 1 + len));
        };

        let (value, digits) = int_value(number, IntFormat::LEADING_X)?;
        if number.as_bytes().get(digits) != Some(&b';') {
            return None;
        }
        let c = u32::try_from(value)
            .ok()
            .filter(|&v| v != 0)
            .and_then(char::from_u32)?;
        Some((Decoded::Char(c), 2 + digits + 1))
    }

    /// Decode all references in `src`, reusing `buffer`.
    ///
    /// Text without `&` is returned as is and `buffer` is left alone.
    /// Otherwise `buffer` is overwritten with the decoded text.
    pub fn translate<'s>(&self, src: &'s str, buffer: &'s mut String) -> &'s str {
        if !src.contains('&') {
            return src;
        }
        buffer.clear();
        self.decode_into(src, buffer);
        buffer
    }

    /// Decode all references in `src` into a fresh string.
    ///
    /// One byte of slack is reserved so a trailing space can be appended
    /// without reallocating.
    #[must_use]
    pub fn translate_copy(&self, src: &str) -> String {
        let mut out = String::with_capacity(src.len() + 1);
        self.decode_into(src, &mut out);
        out
    }

    /// Decode references in place and return the new length.
    ///
    /// Decoded text never outgrows its reference: a named entry whose value
    /// is longer than the reference is left literal. Bytes that are not valid
    /// UTF-8 are copied through.
    pub fn translate_in_place(&self, buf: &mut Vec<u8>) -> usize {
        let mut read = 0;
        let mut write = 0;
        let mut scratch = [0u8; 4];

        while read < buf.len() {
            if buf[read] == b'&' {
                let window = &buf[read..buf.len().min(read + MAX_REFERENCE_LEN)];
                let text = match std::str::from_utf8(window) {
                    Ok(text) => text,
                    Err(error) => std::str::from_utf8(&window[..error.valid_up_to()]).unwrap_or_default(),
                };
                let decoded = self
                    .decode_reference(text)
                    .filter(|(decoded, len)| decoded.len_utf8() <= *len);
                if let Some((decoded, len)) = decoded {
                    let bytes = match decoded {
                        Decoded::Named(value) => value.as_bytes(),
                        Decoded::Char(c) => c.encode_utf8(&mut scratch).as_bytes(),
                    };
                    buf[write..write + bytes.len()].copy_from_slice(bytes);
                    write += bytes.len();
                    read += len;
                    continue;
                }
            }
            buf[write] = buf[read];
            write += 1;
            read += 1;
        }

        buf.truncate(write);
        write
    }

    fn decode_into(&self, src: &str, out: &mut String) {
        let mut rest = src;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            rest = &rest[amp..];
            match self.decode_reference(rest) {
                Some((decoded, len)) => {
                    decoded.push_to(out);
                    rest = &rest[len..];
                }
                None => {
                    out.push('&');
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);
    }
}
