//! Compiles the Unicode Character Database into C lookup tables.
//!
//! The pipeline: download (or read cached) UCD files, parse them into
//! per-codepoint records, complete the implicit case mappings, flatten
//! everything into one descriptor per codepoint, compress the descriptors
//! into a paged two-level table, reduce the per-property facts into range
//! rules, and render the lot as a single C source file.

mod descriptor;
mod emit;
mod fetch;
mod paged;
mod reduce;
mod ucd;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};

use crate::descriptor::WidthTables;
use crate::emit::Artifact;
use crate::paged::{PAGE_SIZE, PagedTable};
use crate::reduce::{MergePolicy, RangeRule};

const HELP: &str = "\
Usage: utf8-table-gen [OPTIONS] [OUTPUT]

Compiles the Unicode Character Database into compact C lookup tables.

Arguments:
  [OUTPUT]  Destination path [default: sfce_utf8_properties.c]

Options:
  --cache-dir <DIR>  Cache directory for the downloaded UCD files [default: ucd-cache]
  -h, --help         Print help
";

fn main() -> anyhow::Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let cache_dir: PathBuf = args
        .opt_value_from_str("--cache-dir")?
        .unwrap_or_else(|| PathBuf::from("ucd-cache"));
    let output: PathBuf = args
        .opt_free_from_str()?
        .unwrap_or_else(|| PathBuf::from("sfce_utf8_properties.c"));

    let rest = args.finish();
    if !rest.is_empty() {
        bail!("unrecognized arguments: {rest:?}");
    }

    let files = fetch::UcdFiles::download(&cache_dir)?;

    let derived = ucd::derived_sets(&ucd::parse_hex_ranges(&files.derived_core_properties));
    let widths = WidthTables {
        east_asian: ucd::east_asian_widths(&ucd::parse_hex_ranges(&files.east_asian_width))?,
    };

    let records = ucd::parse_unicode_data(&files.unicode_data)?;
    let records = ucd::backfill_case_mappings(records, &derived);
    eprintln!("parsed {} codepoint records", records.len());

    let foldings = ucd::parse_case_folding(&files.case_folding);
    let exclusions = ucd::composition_exclusions(&files.composition_exclusions);
    let boundclasses = ucd::merge_boundclasses(
        &ucd::parse_hex_ranges(&files.grapheme_break_property),
        &ucd::parse_hex_ranges(&files.emoji_data),
    );

    let mut to_upper = Vec::new();
    let mut to_lower = Vec::new();
    let mut to_title = Vec::new();
    let mut category = Vec::new();
    let mut width = Vec::new();
    for record in &records {
        if let Some(upper) = record.simple_uppercase {
            to_upper.push(RangeRule::singleton(record.code, i64::from(upper)));
        }
        if let Some(lower) = record.simple_lowercase {
            to_lower.push(RangeRule::singleton(record.code, i64::from(lower)));
        }
        if let Some(title) = record.simple_titlecase {
            to_title.push(RangeRule::singleton(record.code, i64::from(title)));
        }
        category.push(RangeRule::singleton(record.code, record.category as i64));
        width.push(RangeRule::singleton(
            record.code,
            i64::from(descriptor::codepoint_width(&widths, record.code, record.category)),
        ));
    }

    // Full foldings expand to multiple codepoints and can't be expressed by
    // a single-return dispatch; only the one-to-one foldings are kept.
    let fold_simple: Vec<RangeRule> = foldings
        .iter()
        .filter_map(|(code, mapping)| match mapping[..] {
            [to] => Some(RangeRule::singleton(*code, i64::from(to))),
            _ => None,
        })
        .collect();

    let mut boundclass_labels = vec!["NONE".to_string()];
    let mut boundclass = Vec::new();
    for (&cp, label) in &boundclasses {
        let slot = match boundclass_labels.iter().position(|known| known == label) {
            Some(slot) => slot,
            None => {
                boundclass_labels.push(label.clone());
                boundclass_labels.len() - 1
            }
        };
        boundclass.push(RangeRule::singleton(cp, slot as i64));
    }

    let composition_exclusion: Vec<RangeRule> = exclusions
        .iter()
        .map(|&cp| RangeRule::singleton(cp, 1))
        .collect();

    let by_code: HashMap<u32, ucd::UnicodeRecord> =
        records.into_iter().map(|record| (record.code, record)).collect();
    let descriptors = descriptor::build_descriptors(&by_code, &widths);

    let table = PagedTable::build(&descriptors, PAGE_SIZE);
    table.verify(&descriptors)?;
    eprintln!(
        "{} unique properties, {} indices, {} pages",
        table.entries.len(),
        table.index.len(),
        table.page_offsets.len()
    );

    let artifact = Artifact {
        table,
        boundclass_labels,
        to_upper: reduce::reduce(to_upper, MergePolicy::Offset),
        to_lower: reduce::reduce(to_lower, MergePolicy::Offset),
        to_title: reduce::reduce(to_title, MergePolicy::Offset),
        fold_simple: reduce::reduce(fold_simple, MergePolicy::Offset),
        category: reduce::reduce(category, MergePolicy::FixedOutput),
        width: reduce::reduce(width, MergePolicy::FixedOutput),
        boundclass: reduce::reduce(boundclass, MergePolicy::FixedOutput),
        composition_exclusion: reduce::reduce(composition_exclusion, MergePolicy::FixedOutput),
    };

    let source = emit::generate_c(&artifact, fetch::UNICODE_VERSION);
    fs::write(&output, source).with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!("wrote {}", output.display());

    Ok(())
}
