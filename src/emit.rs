//! Renders the compressed table and the reduced rule sets as one
//! self-contained C source file.
//!
//! Everything here is mechanical: exact values in, exact literals out, with
//! iteration order fixed by the upstream components (first-seen order for
//! table entries, ascending codepoint order for rules).

use std::fmt::Write as _;

use indoc::writedoc;

use crate::descriptor::PropertyDescriptor;
use crate::paged::PagedTable;
use crate::reduce::{self, MergePolicy, RangeRule};
use crate::ucd::{BidiClass, DecompositionKind, GeneralCategory};

const MAX_LINE_WIDTH: usize = 80;

/// Everything the emitter needs, computed by the pipeline beforehand.
pub struct Artifact {
    pub table: PagedTable<PropertyDescriptor>,
    /// Grapheme boundclass enum labels, insertion-ordered, `NONE` first.
    pub boundclass_labels: Vec<String>,
    pub to_upper: Vec<RangeRule>,
    pub to_lower: Vec<RangeRule>,
    pub to_title: Vec<RangeRule>,
    pub fold_simple: Vec<RangeRule>,
    pub category: Vec<RangeRule>,
    pub width: Vec<RangeRule>,
    pub boundclass: Vec<RangeRule>,
    pub composition_exclusion: Vec<RangeRule>,
}

pub fn generate_c(artifact: &Artifact, unicode_version: &str) -> String {
    let mut buf = String::new();

    _ = writedoc!(
        buf,
        "
        //
        // Generated by utf8-table-gen on {}, from Unicode {}
        // {} unique properties, {} indices, {} pages of {} codepoints
        //

        #include <stdint.h>

        ",
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        unicode_version,
        artifact.table.entries.len(),
        artifact.table.index.len(),
        artifact.table.page_offsets.len(),
        artifact.table.page_size(),
    );

    write_category_enum(&mut buf);
    write_bidi_class_enum(&mut buf);
    write_decomposition_enum(&mut buf);
    write_boundclass_enum(&mut buf, &artifact.boundclass_labels);
    write_property_struct(&mut buf);
    write_property_tables(&mut buf, &artifact.table);
    write_property_lookup(&mut buf, &artifact.table);

    let codepoint = |value: i64| value.to_string();
    let category = |value: i64| {
        format!(
            "SFCE_UNICODE_CATEGORY_{}",
            GeneralCategory::ALL[value as usize].emit_name()
        )
    };
    let boundclass =
        |value: i64| format!("SFCE_UNICODE_BOUNDCLASS_{}", artifact.boundclass_labels[value as usize]);

    buf.push('\n');
    write_dispatch(
        &mut buf,
        "int32_t sfce_codepoint_to_upper(int32_t codepoint)",
        &artifact.to_upper,
        MergePolicy::Offset,
        "codepoint",
        &codepoint,
    );
    write_dispatch(
        &mut buf,
        "int32_t sfce_codepoint_to_lower(int32_t codepoint)",
        &artifact.to_lower,
        MergePolicy::Offset,
        "codepoint",
        &codepoint,
    );
    write_dispatch(
        &mut buf,
        "int32_t sfce_codepoint_to_title(int32_t codepoint)",
        &artifact.to_title,
        MergePolicy::Offset,
        "codepoint",
        &codepoint,
    );
    write_dispatch(
        &mut buf,
        "int32_t sfce_codepoint_fold_simple(int32_t codepoint)",
        &artifact.fold_simple,
        MergePolicy::Offset,
        "codepoint",
        &codepoint,
    );
    write_dispatch(
        &mut buf,
        "enum sfce_unicode_category sfce_codepoint_category(int32_t codepoint)",
        &artifact.category,
        MergePolicy::FixedOutput,
        "SFCE_UNICODE_CATEGORY_CN",
        &category,
    );
    write_dispatch(
        &mut buf,
        "int8_t sfce_codepoint_width(int32_t codepoint)",
        &artifact.width,
        MergePolicy::FixedOutput,
        "1",
        &codepoint,
    );
    write_dispatch(
        &mut buf,
        "enum sfce_unicode_boundclass sfce_codepoint_boundclass(int32_t codepoint)",
        &artifact.boundclass,
        MergePolicy::FixedOutput,
        "SFCE_UNICODE_BOUNDCLASS_NONE",
        &boundclass,
    );
    write_dispatch(
        &mut buf,
        "int32_t sfce_codepoint_composition_exclusion(int32_t codepoint)",
        &artifact.composition_exclusion,
        MergePolicy::FixedOutput,
        "0",
        &codepoint,
    );

    buf
}

fn write_category_enum(buf: &mut String) {
    buf.push_str("// https://www.compart.com/en/unicode/category\n");
    buf.push_str("enum sfce_unicode_category {\n");
    for (value, category) in GeneralCategory::ALL.iter().enumerate() {
        _ = writeln!(
            buf,
            "    SFCE_UNICODE_CATEGORY_{} = {}, // {}",
            category.emit_name(),
            value,
            category.description(),
        );
    }
    buf.push_str("};\n\n");
}

fn write_bidi_class_enum(buf: &mut String) {
    buf.push_str("enum sfce_unicode_bidi_class {\n");
    for (value, class) in BidiClass::ALL.iter().enumerate() {
        _ = writeln!(buf, "    SFCE_UNICODE_BIDI_CLASS_{} = {},", class.emit_name(), value);
    }
    buf.push_str("};\n\n");
}

fn write_decomposition_enum(buf: &mut String) {
    buf.push_str("enum sfce_unicode_decomposition {\n");
    for (value, kind) in DecompositionKind::ALL.iter().enumerate() {
        _ = writeln!(buf, "    SFCE_UNICODE_DECOMPOSITION_{} = {},", kind.emit_name(), value);
    }
    buf.push_str("};\n\n");
}

fn write_boundclass_enum(buf: &mut String, labels: &[String]) {
    buf.push_str("enum sfce_unicode_boundclass {\n");
    for (value, label) in labels.iter().enumerate() {
        _ = writeln!(buf, "    SFCE_UNICODE_BOUNDCLASS_{label} = {value},");
    }
    buf.push_str("};\n\n");
}

fn write_property_struct(buf: &mut String) {
    _ = writedoc!(
        buf,
        "
        struct sfce_utf8_property {{
            uint8_t category;
            uint8_t combining_class;
            uint8_t bidi_class;
            uint8_t decomposition;
            int32_t uppercase_mapping;
            int32_t lowercase_mapping;
            int32_t titlecase_mapping;
            int8_t  width;
            uint8_t utf8_length;
            uint8_t bidi_mirrored;
        }};

        "
    );
}

fn write_property_tables(buf: &mut String, table: &PagedTable<PropertyDescriptor>) {
    let properties: Vec<String> = table.entries.iter().map(property_literal).collect();
    _ = write!(
        buf,
        "static const struct sfce_utf8_property utf8_properties[{}] = ",
        properties.len()
    );
    write_index_array(buf, &properties, MAX_LINE_WIDTH);
    buf.push('\n');

    let indices: Vec<String> = table.index.iter().map(u32::to_string).collect();
    _ = write!(buf, "static const int32_t utf8_property_indices[{}] = ", indices.len());
    write_index_array(buf, &indices, MAX_LINE_WIDTH);
    buf.push('\n');

    let offsets: Vec<String> = table.page_offsets.iter().map(u32::to_string).collect();
    _ = write!(
        buf,
        "static const int32_t utf8_property_page_offsets[{}] = ",
        offsets.len()
    );
    write_index_array(buf, &offsets, MAX_LINE_WIDTH);
}

fn write_property_lookup(buf: &mut String, table: &PagedTable<PropertyDescriptor>) {
    _ = writedoc!(
        buf,
        "

        static inline const struct sfce_utf8_property *sfce_utf8_property_lookup(uint32_t codepoint)
        {{
            uint32_t offset = utf8_property_page_offsets[codepoint / {0}];
            uint32_t entry = utf8_property_indices[offset + codepoint % {0}];
            return &utf8_properties[entry];
        }}
        ",
        table.page_size(),
    );
}

fn property_literal(descriptor: &PropertyDescriptor) -> String {
    format!(
        "{{ SFCE_UNICODE_CATEGORY_{}, {}, SFCE_UNICODE_BIDI_CLASS_{}, SFCE_UNICODE_DECOMPOSITION_{}, {}, {}, {}, {}, {}, {} }}",
        descriptor.category.emit_name(),
        descriptor.combining_class,
        descriptor.bidi_class.emit_name(),
        descriptor.decomposition.emit_name(),
        descriptor.uppercase,
        descriptor.lowercase,
        descriptor.titlecase,
        descriptor.width,
        descriptor.utf8_length,
        descriptor.bidi_mirrored as u8,
    )
}

/// Renders `data` as a brace-wrapped initializer list, entries padded into
/// columns so every line stays under `max_line_size`.
fn write_index_array(buf: &mut String, data: &[String], max_line_size: usize) {
    let entry_len = data.iter().map(String::len).max().unwrap_or(0) + 2;
    let entries_per_line = ((max_line_size - 4) / entry_len).max(1);

    buf.push_str("{\n");

    let mut count = 0;
    while count < data.len() {
        let mut line = format!("{},", data[count]);
        count += 1;

        for _ in 1..entries_per_line {
            if count >= data.len() {
                break;
            }
            let column = line.len() % entry_len;
            if column != 0 {
                line.extend(std::iter::repeat(' ').take(entry_len - column));
            }
            _ = write!(line, "{},", data[count]);
            count += 1;
        }

        _ = writeln!(buf, "    {}", line.trim_end());
    }

    buf.push_str("};\n");
}

/// Renders one reduced rule set as a function body: grouped switch cases for
/// the singleton facts, range guards for the merged ranges, and an explicit
/// default. Ranges never overlap, so guard order carries no meaning.
fn write_dispatch(
    buf: &mut String,
    signature: &str,
    rules: &[RangeRule],
    policy: MergePolicy,
    default_return: &str,
    render: &dyn Fn(i64) -> String,
) {
    let (singles, ranges) = reduce::split_rules(rules.to_vec());

    _ = writeln!(buf, "{signature}\n{{");

    if !singles.is_empty() {
        buf.push_str("    switch (codepoint) {\n");
        for (output, inputs) in reduce::group_singletons(&singles) {
            if let [input] = inputs[..] {
                _ = writeln!(buf, "    case {}: return {};", input, render(output));
                continue;
            }

            let mut line = String::from("    ");
            for input in inputs {
                let label = format!("case {input}: ");
                if line.len() + label.len() >= MAX_LINE_WIDTH {
                    _ = writeln!(buf, "{}", line.trim_end());
                    line = format!("    {label}");
                } else {
                    line.push_str(&label);
                }
            }
            if !line.trim().is_empty() {
                _ = writeln!(buf, "{}", line.trim_end());
            }
            _ = writeln!(buf, "        return {};", render(output));
        }
        buf.push_str("    }\n\n");
    }

    for range in &ranges {
        _ = write!(
            buf,
            "    if (codepoint >= {} && codepoint <= {})",
            range.input_start, range.input_end
        );
        match policy {
            MergePolicy::FixedOutput => {
                _ = writeln!(buf, " return {};", render(range.output));
            }
            MergePolicy::Offset => {
                let difference = range.output - i64::from(range.input_start);
                if difference > 0 {
                    _ = writeln!(buf, " return codepoint + {difference};");
                } else if difference < 0 {
                    _ = writeln!(buf, " return codepoint - {};", -difference);
                } else {
                    _ = writeln!(buf, " return codepoint;");
                }
            }
        }
    }

    _ = writeln!(buf, "    return {default_return};\n}}\n");
}
