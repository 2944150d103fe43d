//! Parsers for the UCD plain-text formats.
//!
//! Two grammars cover every input file: the hex-range list format
//! (`DerivedCoreProperties.txt`, `EastAsianWidth.txt`, `GraphemeBreakProperty.txt`,
//! `emoji-data.txt`, `CompositionExclusions.txt`) and the 15-field semicolon
//! record format of `UnicodeData.txt`. Lines that don't match a grammar are
//! never data lines, so they're skipped rather than reported.

use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result, bail};

/// One `start..=end` range tagged with the file's label field.
/// A line without `..` parses as a single-codepoint range (`start == end`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodepointRange {
    pub start: u32,
    pub end: u32,
    pub label: String,
    pub comment: Option<String>,
}

/// Parses UCD range-list text. Grammar per data line:
/// `HEX[..HEX] [; label] [# comment]`. Anything else is skipped.
/// `CompositionExclusions.txt` has no label field; those lines parse with an
/// empty label.
pub fn parse_hex_ranges(text: &str) -> Vec<CodepointRange> {
    let mut ranges = Vec::new();

    for line in text.lines() {
        let (data, comment) = match line.split_once('#') {
            Some((data, comment)) => (data, Some(comment.trim().to_string())),
            None => (line, None),
        };

        let (range_text, label) = match data.split_once(';') {
            Some((range_text, label)) => (range_text, label.trim()),
            None => (data, ""),
        };

        let range_text = range_text.trim();
        let (start, end) = match range_text.split_once("..") {
            Some((lo, hi)) => match (parse_hex(lo), parse_hex(hi)) {
                (Some(lo), Some(hi)) => (lo, hi),
                _ => continue,
            },
            None => match parse_hex(range_text) {
                Some(cp) => (cp, cp),
                None => continue,
            },
        };

        ranges.push(CodepointRange {
            start,
            end,
            label: label.to_string(),
            comment,
        });
    }

    ranges
}

fn parse_hex(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    u32::from_str_radix(text, 16).ok()
}

/// The two-letter general category, in the emitted enum's order (`Cn` = 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeneralCategory {
    #[default]
    Cn,
    Cc,
    Cf,
    Co,
    Cs,
    Ll,
    Lm,
    Lo,
    Lt,
    Lu,
    Mc,
    Me,
    Mn,
    Nd,
    Nl,
    No,
    Pc,
    Pd,
    Pe,
    Pf,
    Pi,
    Po,
    Ps,
    Sc,
    Sk,
    Sm,
    So,
    Zl,
    Zp,
    Zs,
}

impl GeneralCategory {
    pub const ALL: [Self; 30] = [
        Self::Cn,
        Self::Cc,
        Self::Cf,
        Self::Co,
        Self::Cs,
        Self::Ll,
        Self::Lm,
        Self::Lo,
        Self::Lt,
        Self::Lu,
        Self::Mc,
        Self::Me,
        Self::Mn,
        Self::Nd,
        Self::Nl,
        Self::No,
        Self::Pc,
        Self::Pd,
        Self::Pe,
        Self::Pf,
        Self::Pi,
        Self::Po,
        Self::Ps,
        Self::Sc,
        Self::Sk,
        Self::Sm,
        Self::So,
        Self::Zl,
        Self::Zp,
        Self::Zs,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Some(match label {
            "Cn" => Self::Cn,
            "Cc" => Self::Cc,
            "Cf" => Self::Cf,
            "Co" => Self::Co,
            "Cs" => Self::Cs,
            "Ll" => Self::Ll,
            "Lm" => Self::Lm,
            "Lo" => Self::Lo,
            "Lt" => Self::Lt,
            "Lu" => Self::Lu,
            "Mc" => Self::Mc,
            "Me" => Self::Me,
            "Mn" => Self::Mn,
            "Nd" => Self::Nd,
            "Nl" => Self::Nl,
            "No" => Self::No,
            "Pc" => Self::Pc,
            "Pd" => Self::Pd,
            "Pe" => Self::Pe,
            "Pf" => Self::Pf,
            "Pi" => Self::Pi,
            "Po" => Self::Po,
            "Ps" => Self::Ps,
            "Sc" => Self::Sc,
            "Sk" => Self::Sk,
            "Sm" => Self::Sm,
            "So" => Self::So,
            "Zl" => Self::Zl,
            "Zp" => Self::Zp,
            "Zs" => Self::Zs,
            _ => return None,
        })
    }

    /// The uppercased name used in the emitted `SFCE_UNICODE_CATEGORY_*` constants.
    pub fn emit_name(self) -> &'static str {
        match self {
            Self::Cn => "CN",
            Self::Cc => "CC",
            Self::Cf => "CF",
            Self::Co => "CO",
            Self::Cs => "CS",
            Self::Ll => "LL",
            Self::Lm => "LM",
            Self::Lo => "LO",
            Self::Lt => "LT",
            Self::Lu => "LU",
            Self::Mc => "MC",
            Self::Me => "ME",
            Self::Mn => "MN",
            Self::Nd => "ND",
            Self::Nl => "NL",
            Self::No => "NO",
            Self::Pc => "PC",
            Self::Pd => "PD",
            Self::Pe => "PE",
            Self::Pf => "PF",
            Self::Pi => "PI",
            Self::Po => "PO",
            Self::Ps => "PS",
            Self::Sc => "SC",
            Self::Sk => "SK",
            Self::Sm => "SM",
            Self::So => "SO",
            Self::Zl => "ZL",
            Self::Zp => "ZP",
            Self::Zs => "ZS",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Cn => "Other, not assigned",
            Self::Cc => "Control",
            Self::Cf => "Format",
            Self::Co => "Private Use",
            Self::Cs => "Surrogate",
            Self::Ll => "Lowercase Letter",
            Self::Lm => "Modifier Letter",
            Self::Lo => "Other Letter",
            Self::Lt => "Titlecase Letter",
            Self::Lu => "Uppercase Letter",
            Self::Mc => "Spacing Mark",
            Self::Me => "Enclosing Mark",
            Self::Mn => "Nonspacing Mark",
            Self::Nd => "Decimal Number",
            Self::Nl => "Letter Number",
            Self::No => "Other Number",
            Self::Pc => "Connector Punctuation",
            Self::Pd => "Dash Punctuation",
            Self::Pe => "Close Punctuation",
            Self::Pf => "Final Punctuation",
            Self::Pi => "Initial Punctuation",
            Self::Po => "Other Punctuation",
            Self::Ps => "Open Punctuation",
            Self::Sc => "Currency Symbol",
            Self::Sk => "Modifier Symbol",
            Self::Sm => "Math Symbol",
            Self::So => "Other Symbol",
            Self::Zl => "Line Separator",
            Self::Zp => "Paragraph Separator",
            Self::Zs => "Space Separator",
        }
    }
}

/// Bidirectional category from `UnicodeData.txt` field 4.
/// `None` is the sentinel for codepoints without a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BidiClass {
    #[default]
    None,
    L,
    R,
    Al,
    En,
    Es,
    Et,
    An,
    Cs,
    Nsm,
    Bn,
    B,
    S,
    Ws,
    On,
    Lre,
    Lro,
    Rle,
    Rlo,
    Pdf,
    Lri,
    Rli,
    Fsi,
    Pdi,
}

impl BidiClass {
    pub const ALL: [Self; 24] = [
        Self::None,
        Self::L,
        Self::R,
        Self::Al,
        Self::En,
        Self::Es,
        Self::Et,
        Self::An,
        Self::Cs,
        Self::Nsm,
        Self::Bn,
        Self::B,
        Self::S,
        Self::Ws,
        Self::On,
        Self::Lre,
        Self::Lro,
        Self::Rle,
        Self::Rlo,
        Self::Pdf,
        Self::Lri,
        Self::Rli,
        Self::Fsi,
        Self::Pdi,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Some(match label {
            "L" => Self::L,
            "R" => Self::R,
            "AL" => Self::Al,
            "EN" => Self::En,
            "ES" => Self::Es,
            "ET" => Self::Et,
            "AN" => Self::An,
            "CS" => Self::Cs,
            "NSM" => Self::Nsm,
            "BN" => Self::Bn,
            "B" => Self::B,
            "S" => Self::S,
            "WS" => Self::Ws,
            "ON" => Self::On,
            "LRE" => Self::Lre,
            "LRO" => Self::Lro,
            "RLE" => Self::Rle,
            "RLO" => Self::Rlo,
            "PDF" => Self::Pdf,
            "LRI" => Self::Lri,
            "RLI" => Self::Rli,
            "FSI" => Self::Fsi,
            "PDI" => Self::Pdi,
            _ => return None,
        })
    }

    pub fn emit_name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::L => "L",
            Self::R => "R",
            Self::Al => "AL",
            Self::En => "EN",
            Self::Es => "ES",
            Self::Et => "ET",
            Self::An => "AN",
            Self::Cs => "CS",
            Self::Nsm => "NSM",
            Self::Bn => "BN",
            Self::B => "B",
            Self::S => "S",
            Self::Ws => "WS",
            Self::On => "ON",
            Self::Lre => "LRE",
            Self::Lro => "LRO",
            Self::Rle => "RLE",
            Self::Rlo => "RLO",
            Self::Pdf => "PDF",
            Self::Lri => "LRI",
            Self::Rli => "RLI",
            Self::Fsi => "FSI",
            Self::Pdi => "PDI",
        }
    }
}

/// The bracketed tag of the decomposition field. A tag-less mapping is a
/// canonical decomposition; `None` means the field was empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DecompositionKind {
    #[default]
    None,
    Canonical,
    Font,
    NoBreak,
    Initial,
    Medial,
    Final,
    Isolated,
    Circle,
    Super,
    Sub,
    Vertical,
    Wide,
    Narrow,
    Small,
    Square,
    Fraction,
    Compat,
}

impl DecompositionKind {
    pub const ALL: [Self; 18] = [
        Self::None,
        Self::Canonical,
        Self::Font,
        Self::NoBreak,
        Self::Initial,
        Self::Medial,
        Self::Final,
        Self::Isolated,
        Self::Circle,
        Self::Super,
        Self::Sub,
        Self::Vertical,
        Self::Wide,
        Self::Narrow,
        Self::Small,
        Self::Square,
        Self::Fraction,
        Self::Compat,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "font" => Self::Font,
            "noBreak" => Self::NoBreak,
            "initial" => Self::Initial,
            "medial" => Self::Medial,
            "final" => Self::Final,
            "isolated" => Self::Isolated,
            "circle" => Self::Circle,
            "super" => Self::Super,
            "sub" => Self::Sub,
            "vertical" => Self::Vertical,
            "wide" => Self::Wide,
            "narrow" => Self::Narrow,
            "small" => Self::Small,
            "square" => Self::Square,
            "fraction" => Self::Fraction,
            "compat" => Self::Compat,
            _ => return None,
        })
    }

    pub fn emit_name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Canonical => "CANONICAL",
            Self::Font => "FONT",
            Self::NoBreak => "NOBREAK",
            Self::Initial => "INITIAL",
            Self::Medial => "MEDIAL",
            Self::Final => "FINAL",
            Self::Isolated => "ISOLATED",
            Self::Circle => "CIRCLE",
            Self::Super => "SUPER",
            Self::Sub => "SUB",
            Self::Vertical => "VERTICAL",
            Self::Wide => "WIDE",
            Self::Narrow => "NARROW",
            Self::Small => "SMALL",
            Self::Square => "SQUARE",
            Self::Fraction => "FRACTION",
            Self::Compat => "COMPAT",
        }
    }
}

/// East-Asian width class from `EastAsianWidth.txt`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EastAsianWidth {
    Wide,
    Fullwidth,
    Narrow,
    Halfwidth,
    Ambiguous,
    Neutral,
}

impl EastAsianWidth {
    pub fn from_label(label: &str) -> Option<Self> {
        Some(match label {
            "W" => Self::Wide,
            "F" => Self::Fullwidth,
            "Na" => Self::Narrow,
            "H" => Self::Halfwidth,
            "A" => Self::Ambiguous,
            "N" => Self::Neutral,
            _ => return None,
        })
    }
}

/// The decomposition field with its internal grammar parsed out.
/// `mapping` may be empty even when the field wasn't, which keeps
/// "no decomposition" distinguishable from "decomposition with no mapping".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decomposition {
    pub kind: DecompositionKind,
    pub mapping: Vec<u32>,
}

/// One explicit line of `UnicodeData.txt`. Optional fields are `Option`s;
/// an empty numeric field is absent, never zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnicodeRecord {
    pub code: u32,
    pub name: String,
    pub category: GeneralCategory,
    pub combining_class: u8,
    pub bidi_class: BidiClass,
    pub decomposition: Option<Decomposition>,
    pub bidi_mirrored: bool,
    pub simple_uppercase: Option<u32>,
    pub simple_lowercase: Option<u32>,
    pub simple_titlecase: Option<u32>,
}

/// Parses `UnicodeData.txt`: 15 semicolon-delimited fields per line.
/// Lines without a leading hex codepoint or with too few fields are not data
/// lines and are skipped. Unknown category/bidi/decomposition labels in a
/// data line indicate a UCD format change and are fatal.
pub fn parse_unicode_data(text: &str) -> Result<Vec<UnicodeRecord>> {
    let mut records = Vec::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() < 15 {
            continue;
        }
        let Some(code) = parse_hex(fields[0]) else {
            continue;
        };

        let category = GeneralCategory::from_label(fields[2]).with_context(|| {
            format!("unrecognized general category {:?} for U+{code:04X}", fields[2])
        })?;
        let combining_class = fields[3]
            .parse::<u8>()
            .with_context(|| format!("bad combining class {:?} for U+{code:04X}", fields[3]))?;
        let bidi_class = BidiClass::from_label(fields[4])
            .with_context(|| format!("unrecognized bidi class {:?} for U+{code:04X}", fields[4]))?;
        let decomposition = parse_decomposition(fields[5], code)?;

        records.push(UnicodeRecord {
            code,
            name: fields[1].to_string(),
            category,
            combining_class,
            bidi_class,
            decomposition,
            bidi_mirrored: fields[9] == "Y",
            simple_uppercase: parse_hex(fields[12]),
            simple_lowercase: parse_hex(fields[13]),
            simple_titlecase: parse_hex(fields[14]),
        });
    }

    Ok(records)
}

fn parse_decomposition(field: &str, code: u32) -> Result<Option<Decomposition>> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(None);
    }

    let (kind, rest) = if let Some(tagged) = field.strip_prefix('<') {
        let (tag, rest) = tagged
            .split_once('>')
            .with_context(|| format!("unterminated decomposition tag for U+{code:04X}"))?;
        let kind = DecompositionKind::from_tag(tag)
            .with_context(|| format!("unrecognized decomposition tag {tag:?} for U+{code:04X}"))?;
        (kind, rest)
    } else {
        (DecompositionKind::Canonical, field)
    };

    let mut mapping = Vec::new();
    for part in rest.split_whitespace() {
        let cp = parse_hex(part)
            .with_context(|| format!("bad decomposition mapping {part:?} for U+{code:04X}"))?;
        mapping.push(cp);
    }

    Ok(Some(Decomposition { kind, mapping }))
}

/// Codepoint membership sets expanded from `DerivedCoreProperties.txt`.
/// These must exist before case-mapping backfill can run.
pub struct DerivedSets {
    pub uppercase: HashSet<u32>,
    pub lowercase: HashSet<u32>,
}

pub fn derived_sets(ranges: &[CodepointRange]) -> DerivedSets {
    DerivedSets {
        uppercase: set_from_ranges(ranges, "Uppercase"),
        lowercase: set_from_ranges(ranges, "Lowercase"),
    }
}

fn set_from_ranges(ranges: &[CodepointRange], label: &str) -> HashSet<u32> {
    let mut set = HashSet::new();
    for range in ranges.iter().filter(|r| r.label == label) {
        set.extend(range.start..=range.end);
    }
    set
}

/// Phase 2 of the record pipeline: produces new records with implicit case
/// mappings filled in from derived-set membership. A codepoint with neither
/// explicit mapping maps to itself in the opposite case when the derived set
/// says it's cased; titlecase falls back to the (possibly derived) uppercase.
pub fn backfill_case_mappings(records: Vec<UnicodeRecord>, sets: &DerivedSets) -> Vec<UnicodeRecord> {
    records
        .into_iter()
        .map(|record| {
            let mut uppercase = record.simple_uppercase;
            let mut lowercase = record.simple_lowercase;

            if uppercase.is_none() && lowercase.is_none() {
                if sets.lowercase.contains(&record.code) {
                    uppercase = Some(record.code);
                }
                if sets.uppercase.contains(&record.code) {
                    lowercase = Some(record.code);
                }
            }

            let titlecase = record.simple_titlecase.or(uppercase);

            UnicodeRecord {
                simple_uppercase: uppercase,
                simple_lowercase: lowercase,
                simple_titlecase: titlecase,
                ..record
            }
        })
        .collect()
}

/// Parses `CaseFolding.txt`, keeping common (`C`) and full (`F`) foldings
/// only, like the original generator. Entries stay in file order.
pub fn parse_case_folding(text: &str) -> Vec<(u32, Vec<u32>)> {
    let mut foldings = Vec::new();

    for line in text.lines() {
        let data = line.split('#').next().unwrap_or("");
        let fields: Vec<&str> = data.split(';').collect();
        if fields.len() < 3 {
            continue;
        }
        let Some(code) = parse_hex(fields[0]) else {
            continue;
        };
        let status = fields[1].trim();
        if status != "C" && status != "F" {
            continue;
        }
        let mapping: Vec<u32> = fields[2].split_whitespace().filter_map(parse_hex).collect();
        if !mapping.is_empty() {
            foldings.push((code, mapping));
        }
    }

    foldings
}

/// Expands `CompositionExclusions.txt` into the excluded codepoints.
pub fn composition_exclusions(text: &str) -> Vec<u32> {
    let mut exclusions = Vec::new();
    for range in parse_hex_ranges(text) {
        exclusions.extend(range.start..=range.end);
    }
    exclusions
}

/// Merges `GraphemeBreakProperty.txt` and `emoji-data.txt` into one
/// label-per-codepoint map. The files overlap; the later file wins per
/// codepoint. Labels are uppercased for emission.
pub fn merge_boundclasses(
    grapheme: &[CodepointRange],
    emoji: &[CodepointRange],
) -> BTreeMap<u32, String> {
    let mut boundclasses = BTreeMap::new();
    for range in grapheme.iter().chain(emoji) {
        let label = range.label.to_uppercase();
        for cp in range.start..=range.end {
            boundclasses.insert(cp, label.clone());
        }
    }
    boundclasses
}

/// Builds the East-Asian width classification map. Unknown class labels are
/// fatal; they'd silently skew every width downstream.
pub fn east_asian_widths(ranges: &[CodepointRange]) -> Result<BTreeMap<u32, EastAsianWidth>> {
    let mut widths = BTreeMap::new();
    for range in ranges {
        match EastAsianWidth::from_label(&range.label) {
            Some(class) => {
                for cp in range.start..=range.end {
                    widths.insert(cp, class);
                }
            }
            None => bail!(
                "unrecognized East-Asian width class {:?} for U+{:04X} to U+{:04X}",
                range.label,
                range.start,
                range.end
            ),
        }
    }
    Ok(widths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_ranges_skip_comments_and_blanks() {
        let text = "# EastAsianWidth-16.0.0.txt\n\
                    \n\
                    0020..007E     ; Na # 95 chars\n\
                    00A1           ; A\n\
                    garbage line\n";
        let ranges = parse_hex_ranges(text);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start, 0x20);
        assert_eq!(ranges[0].end, 0x7E);
        assert_eq!(ranges[0].label, "Na");
        assert_eq!(ranges[0].comment.as_deref(), Some("95 chars"));
        assert_eq!(ranges[1].start, 0xA1);
        assert_eq!(ranges[1].end, 0xA1);
        assert_eq!(ranges[1].comment, None);
    }

    #[test]
    fn hex_ranges_without_label_field() {
        // CompositionExclusions.txt has no semicolon-delimited label.
        let ranges = parse_hex_ranges("0958 # DEVANAGARI LETTER QA\n");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start, 0x958);
        assert_eq!(ranges[0].label, "");
    }

    #[test]
    fn hex_parsing_is_case_insensitive() {
        let ranges = parse_hex_ranges("1f600..1f64f ; Extended_Pictographic\n");
        assert_eq!(ranges[0].start, 0x1F600);
        assert_eq!(ranges[0].end, 0x1F64F);
    }

    #[test]
    fn unicode_data_basic_record() {
        let text = "0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;\n";
        let records = parse_unicode_data(text).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.code, 0x41);
        assert_eq!(r.category, GeneralCategory::Lu);
        assert_eq!(r.combining_class, 0);
        assert_eq!(r.bidi_class, BidiClass::L);
        assert_eq!(r.decomposition, None);
        assert!(!r.bidi_mirrored);
        assert_eq!(r.simple_uppercase, None);
        assert_eq!(r.simple_lowercase, Some(0x61));
        assert_eq!(r.simple_titlecase, None);
    }

    #[test]
    fn unicode_data_decomposition_grammar() {
        let text = "00C5;LATIN CAPITAL LETTER A WITH RING ABOVE;Lu;0;L;0041 030A;;;;N;;;;00E5;\n\
                    00A0;NO-BREAK SPACE;Zs;0;CS;<noBreak> 0020;;;;N;;;;;\n";
        let records = parse_unicode_data(text).unwrap();

        let canonical = records[0].decomposition.as_ref().unwrap();
        assert_eq!(canonical.kind, DecompositionKind::Canonical);
        assert_eq!(canonical.mapping, vec![0x41, 0x30A]);

        let compat = records[1].decomposition.as_ref().unwrap();
        assert_eq!(compat.kind, DecompositionKind::NoBreak);
        assert_eq!(compat.mapping, vec![0x20]);
    }

    #[test]
    fn unicode_data_empty_fields_are_absent() {
        let text = "00B5;MICRO SIGN;Ll;0;L;<compat> 03BC;;;;N;;;039C;;039C\n";
        let records = parse_unicode_data(text).unwrap();
        let r = &records[0];
        // Empty lowercase field parses to absent, not zero.
        assert_eq!(r.simple_lowercase, None);
        assert_eq!(r.simple_uppercase, Some(0x39C));
        assert_eq!(r.simple_titlecase, Some(0x39C));
    }

    #[test]
    fn unicode_data_skips_non_data_lines() {
        let text = "# comment\n\nnot a record at all\n";
        assert!(parse_unicode_data(text).unwrap().is_empty());
    }

    #[test]
    fn unicode_data_rejects_unknown_category() {
        let text = "0041;TEST;Xx;0;L;;;;;N;;;;;\n";
        assert!(parse_unicode_data(text).is_err());
    }

    #[test]
    fn derived_set_expansion_is_inclusive() {
        let ranges = parse_hex_ranges("0041..0043 ; Uppercase\n00B5 ; Lowercase\n");
        let sets = derived_sets(&ranges);
        assert_eq!(sets.uppercase.len(), 3);
        assert!(sets.uppercase.contains(&0x41));
        assert!(sets.uppercase.contains(&0x43));
        assert!(sets.lowercase.contains(&0xB5));
    }

    #[test]
    fn backfill_maps_cased_codepoints_to_themselves() {
        let text = "02B0;MODIFIER LETTER SMALL H;Lm;0;L;<super> 0068;;;;N;;;;;\n";
        let records = parse_unicode_data(text).unwrap();

        let mut sets = DerivedSets {
            uppercase: HashSet::new(),
            lowercase: HashSet::new(),
        };
        sets.lowercase.insert(0x2B0);

        let records = backfill_case_mappings(records, &sets);
        assert_eq!(records[0].simple_uppercase, Some(0x2B0));
        assert_eq!(records[0].simple_lowercase, None);
        // Titlecase follows the derived uppercase.
        assert_eq!(records[0].simple_titlecase, Some(0x2B0));
    }

    #[test]
    fn backfill_leaves_explicit_mappings_alone() {
        let text = "0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;\n";
        let records = parse_unicode_data(text).unwrap();

        let mut sets = DerivedSets {
            uppercase: HashSet::new(),
            lowercase: HashSet::new(),
        };
        sets.uppercase.insert(0x41);

        let records = backfill_case_mappings(records, &sets);
        // An explicit lowercase mapping exists, so nothing is derived.
        assert_eq!(records[0].simple_uppercase, None);
        assert_eq!(records[0].simple_lowercase, Some(0x61));
    }

    #[test]
    fn case_folding_keeps_common_and_full_only() {
        let text = "0041; C; 0061; # LATIN CAPITAL LETTER A\n\
                    00DF; F; 0073 0073; # LATIN SMALL LETTER SHARP S\n\
                    1E9E; S; 00DF; # (simple variant, skipped)\n\
                    0130; T; 0069 0307; # (turkic, skipped)\n";
        let foldings = parse_case_folding(text);
        assert_eq!(foldings.len(), 2);
        assert_eq!(foldings[0], (0x41, vec![0x61]));
        assert_eq!(foldings[1], (0xDF, vec![0x73, 0x73]));
    }

    #[test]
    fn boundclass_merge_is_last_write_wins() {
        let grapheme = parse_hex_ranges("200D ; ZWJ\n");
        let emoji = parse_hex_ranges("200D ; Emoji_Component\n");
        let map = merge_boundclasses(&grapheme, &emoji);
        assert_eq!(map[&0x200D], "EMOJI_COMPONENT");
    }

    #[test]
    fn east_asian_width_rejects_unknown_class() {
        let ranges = parse_hex_ranges("0041 ; Zz\n");
        assert!(east_asian_widths(&ranges).is_err());
    }
}
