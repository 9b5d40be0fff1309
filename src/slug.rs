use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_SLUG: &str = "post";

lazy_static! {
    static ref APOSTROPHES: Regex = Regex::new(r"['’]").unwrap();
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Lower-case, hyphen separated, ASCII only
pub fn derive_slug(title: &str) -> String {
    let ascii = unidecode::unidecode(title.trim());
    let lower = ascii.to_lowercase();
    let no_quotes = APOSTROPHES.replace_all(&lower, "");
    let slug = NON_ALNUM.replace_all(&no_quotes, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// First of `candidate`, `candidate-2`, `candidate-3`... taken by neither
/// an indexed post nor a document already on disk.
///
/// Nothing is reserved, the caller must persist the result before another run allocates.
pub fn allocate_unique(candidate: &str, existing_slugs: &HashSet<String>, existing_content_ids: &HashSet<String>) -> String {
    let taken = |slug: &str| existing_slugs.contains(slug) || existing_content_ids.contains(slug);

    let mut slug = candidate.to_string();
    let mut suffix = 2;
    while taken(&slug) {
        slug = format!("{}-{}", candidate, suffix);
        suffix += 1;
    }
    slug
}
