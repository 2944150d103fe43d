//! Per-codepoint property descriptors, the unit the compressors operate on.

use std::collections::{BTreeMap, HashMap};

use crate::ucd::{BidiClass, DecompositionKind, EastAsianWidth, GeneralCategory, UnicodeRecord};

pub const MAX_CODEPOINT: u32 = 0x10FFFF;
pub const CODEPOINT_COUNT: usize = MAX_CODEPOINT as usize + 1;

/// The fixed-shape per-codepoint output record. Two codepoints with identical
/// fields are interchangeable, which is what the paged compressor exploits,
/// so this must stay `Copy + Eq + Hash`.
///
/// Field order matches the emitted `struct sfce_utf8_property` initializers.
/// Case mappings use `-1` for "no mapping".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyDescriptor {
    pub category: GeneralCategory,
    pub combining_class: u8,
    pub bidi_class: BidiClass,
    pub decomposition: DecompositionKind,
    pub uppercase: i32,
    pub lowercase: i32,
    pub titlecase: i32,
    pub width: i8,
    pub utf8_length: u8,
    pub bidi_mirrored: bool,
}

impl Default for PropertyDescriptor {
    fn default() -> Self {
        Self {
            category: GeneralCategory::Cn,
            combining_class: 0,
            bidi_class: BidiClass::None,
            decomposition: DecompositionKind::None,
            uppercase: -1,
            lowercase: -1,
            titlecase: -1,
            width: 1,
            utf8_length: 0,
            bidi_mirrored: false,
        }
    }
}

/// Read-only width configuration, built once at startup and passed into the
/// stages that need it.
pub struct WidthTables {
    pub east_asian: BTreeMap<u32, EastAsianWidth>,
}

impl WidthTables {
    /// The original generator's class-to-column table. `Ambiguous` is a
    /// placeholder resolved to narrow by `codepoint_width`; `Neutral` falls
    /// through to the category default.
    fn base_width(class: EastAsianWidth) -> Option<i8> {
        match class {
            EastAsianWidth::Wide | EastAsianWidth::Fullwidth => Some(2),
            EastAsianWidth::Narrow | EastAsianWidth::Halfwidth => Some(1),
            EastAsianWidth::Ambiguous => Some(-1),
            EastAsianWidth::Neutral => None,
        }
    }
}

/// Terminal column width of a codepoint. The decision order matters:
/// the U+00AD soft-hyphen exception must win over the zero-width `Mn`
/// fallthrough, and the zero-width categories must win over the East-Asian
/// classification.
pub fn codepoint_width(tables: &WidthTables, cp: u32, category: GeneralCategory) -> i8 {
    let mut default_width = 1;

    match category {
        GeneralCategory::Mc => default_width = 0,
        GeneralCategory::Mn if cp == 0x00AD => return 1,
        GeneralCategory::Mn
        | GeneralCategory::Me
        | GeneralCategory::Cc
        | GeneralCategory::Cf
        | GeneralCategory::Cs
        | GeneralCategory::Zp => return 0,
        _ => {}
    }

    if let Some(&class) = tables.east_asian.get(&cp) {
        if let Some(width) = WidthTables::base_width(class) {
            // Ambiguous is treated as narrow; see the width policy note in DESIGN.md.
            return if width < 0 { 1 } else { width };
        }
    }

    default_width
}

/// Length of the UTF-8 encoding of `cp`, or 0 beyond the Unicode range.
pub fn utf8_sequence_length(cp: u32) -> u8 {
    if cp & 0xFFFF_FF80 == 0 {
        1
    } else if cp & 0xFFFF_F800 == 0 {
        2
    } else if cp & 0xFFFF_0000 == 0 {
        3
    } else if cp & 0xFFE0_0000 == 0 {
        4
    } else {
        0
    }
}

/// Produces one descriptor per codepoint over the whole Unicode space.
/// Codepoints without an explicit record get the `Cn` defaults; the UTF-8
/// length is a function of the codepoint alone and is always filled in.
pub fn build_descriptors(
    records: &HashMap<u32, UnicodeRecord>,
    tables: &WidthTables,
) -> Vec<PropertyDescriptor> {
    let mut descriptors = Vec::with_capacity(CODEPOINT_COUNT);

    for cp in 0..=MAX_CODEPOINT {
        let mut descriptor = PropertyDescriptor {
            utf8_length: utf8_sequence_length(cp),
            ..Default::default()
        };

        if let Some(record) = records.get(&cp) {
            descriptor.category = record.category;
            descriptor.combining_class = record.combining_class;
            descriptor.bidi_class = record.bidi_class;
            descriptor.decomposition = record
                .decomposition
                .as_ref()
                .map_or(DecompositionKind::None, |d| d.kind);
            descriptor.uppercase = record.simple_uppercase.map_or(-1, |cp| cp as i32);
            descriptor.lowercase = record.simple_lowercase.map_or(-1, |cp| cp as i32);
            descriptor.titlecase = record.simple_titlecase.map_or(-1, |cp| cp as i32);
            descriptor.width = codepoint_width(tables, cp, record.category);
            descriptor.bidi_mirrored = record.bidi_mirrored;
        }

        descriptors.push(descriptor);
    }

    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ucd::{east_asian_widths, parse_hex_ranges, parse_unicode_data};

    fn tables(text: &str) -> WidthTables {
        WidthTables {
            east_asian: east_asian_widths(&parse_hex_ranges(text)).unwrap(),
        }
    }

    #[test]
    fn utf8_length_boundaries() {
        assert_eq!(utf8_sequence_length(0x00), 1);
        assert_eq!(utf8_sequence_length(0x7F), 1);
        assert_eq!(utf8_sequence_length(0x80), 2);
        assert_eq!(utf8_sequence_length(0x7FF), 2);
        assert_eq!(utf8_sequence_length(0x800), 3);
        assert_eq!(utf8_sequence_length(0xFFFF), 3);
        assert_eq!(utf8_sequence_length(0x10000), 4);
        assert_eq!(utf8_sequence_length(0x10FFFF), 4);
        assert_eq!(utf8_sequence_length(0x200000), 0);
    }

    #[test]
    fn soft_hyphen_is_narrow_despite_nonspacing_mark() {
        let tables = tables("");
        assert_eq!(codepoint_width(&tables, 0x00AD, GeneralCategory::Mn), 1);
        // Any other Mn codepoint is zero-width.
        assert_eq!(codepoint_width(&tables, 0x0300, GeneralCategory::Mn), 0);
    }

    #[test]
    fn format_category_is_zero_width_regardless_of_east_asian_class() {
        let tables = tables("200B ; W\n");
        assert_eq!(codepoint_width(&tables, 0x200B, GeneralCategory::Cf), 0);
    }

    #[test]
    fn east_asian_classes_map_to_columns() {
        let tables = tables("4E00 ; W\nFF65 ; H\n00A1 ; A\n0041 ; Na\n3000 ; F\n2026 ; N\n");
        assert_eq!(codepoint_width(&tables, 0x4E00, GeneralCategory::Lo), 2);
        assert_eq!(codepoint_width(&tables, 0x3000, GeneralCategory::Zs), 2);
        assert_eq!(codepoint_width(&tables, 0xFF65, GeneralCategory::Po), 1);
        assert_eq!(codepoint_width(&tables, 0x0041, GeneralCategory::Lu), 1);
        // Ambiguous resolves to narrow under this generator's fixed policy.
        assert_eq!(codepoint_width(&tables, 0x00A1, GeneralCategory::Po), 1);
        // Neutral falls back to the default width.
        assert_eq!(codepoint_width(&tables, 0x2026, GeneralCategory::Po), 1);
    }

    #[test]
    fn spacing_mark_defaults_to_zero_but_east_asian_wins() {
        let tables = tables("1100 ; W\n");
        assert_eq!(codepoint_width(&tables, 0x0903, GeneralCategory::Mc), 0);
        assert_eq!(codepoint_width(&tables, 0x1100, GeneralCategory::Mc), 2);
    }

    #[test]
    fn unlisted_codepoints_get_unassigned_defaults() {
        let tables = tables("");
        let descriptors = build_descriptors(&HashMap::new(), &tables);
        assert_eq!(descriptors.len(), CODEPOINT_COUNT);

        let d = &descriptors[0x3FFFF];
        assert_eq!(d.category, GeneralCategory::Cn);
        assert_eq!(d.width, 1);
        assert_eq!(d.uppercase, -1);
        assert_eq!(d.utf8_length, 4);
        assert!(!d.bidi_mirrored);
    }

    #[test]
    fn listed_codepoints_copy_record_fields() {
        let text = "0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;\n";
        let records = parse_unicode_data(text).unwrap();
        let by_code: HashMap<u32, UnicodeRecord> =
            records.into_iter().map(|r| (r.code, r)).collect();

        let tables = tables("0041 ; Na\n");
        let descriptors = build_descriptors(&by_code, &tables);

        let d = &descriptors[0x41];
        assert_eq!(d.category, GeneralCategory::Lu);
        assert_eq!(d.lowercase, 0x61);
        assert_eq!(d.uppercase, -1);
        assert_eq!(d.width, 1);
        assert_eq!(d.utf8_length, 1);
    }
}
