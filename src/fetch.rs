//! Retrieval of the published UCD files for the compiled-in Unicode version.
//!
//! The files are immutable once published, so they're cached on disk and the
//! cache is consulted before the network. The seven fetches are independent
//! and run in parallel; any single failure aborts the whole run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;

pub const UNICODE_VERSION: &str = "16.0.0";
pub const BASE_URL: &str = "https://www.unicode.org/Public/16.0.0/ucd/";

const FILES: [&str; 7] = [
    "UnicodeData.txt",
    "DerivedCoreProperties.txt",
    "EastAsianWidth.txt",
    "auxiliary/GraphemeBreakProperty.txt",
    "emoji/emoji-data.txt",
    "CompositionExclusions.txt",
    "CaseFolding.txt",
];

pub struct UcdFiles {
    pub unicode_data: String,
    pub derived_core_properties: String,
    pub east_asian_width: String,
    pub grapheme_break_property: String,
    pub emoji_data: String,
    pub composition_exclusions: String,
    pub case_folding: String,
}

impl UcdFiles {
    pub fn download(cache_dir: &Path) -> Result<Self> {
        fs::create_dir_all(cache_dir)
            .with_context(|| format!("failed to create cache dir {}", cache_dir.display()))?;

        let contents = FILES
            .par_iter()
            .map(|rel| fetch_ucd(cache_dir, rel))
            .collect::<Result<Vec<String>>>()?;

        let [unicode_data, derived_core_properties, east_asian_width, grapheme_break_property, emoji_data, composition_exclusions, case_folding] =
            <[String; 7]>::try_from(contents).map_err(|_| anyhow!("fetch list length mismatch"))?;

        Ok(Self {
            unicode_data,
            derived_core_properties,
            east_asian_width,
            grapheme_break_property,
            emoji_data,
            composition_exclusions,
            case_folding,
        })
    }
}

fn fetch_ucd(cache_dir: &Path, rel: &str) -> Result<String> {
    let name = rel.rsplit('/').next().unwrap_or(rel);
    let path = cache_dir.join(name);
    if let Ok(contents) = fs::read_to_string(&path) {
        return Ok(contents);
    }

    let url = format!("{BASE_URL}{rel}");
    eprintln!("downloading {url}");
    let text = ureq::get(&url)
        .call()
        .with_context(|| format!("failed to fetch {url}"))?
        .into_string()
        .with_context(|| format!("failed to read response body of {url}"))?;

    fs::write(&path, &text)
        .with_context(|| format!("failed to cache {} at {}", rel, path.display()))?;
    Ok(text)
}
