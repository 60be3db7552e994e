//! Key folding for file names and directories.
//!
//! Directories, not individual paths, are the unit of comparison, so two
//! spellings of the same folder must collapse onto one key. Keys are built
//! by normalizing to NFC and lower-casing:
//!
//! - NFC: `café.txt` - 'é' is U+00E9 (single code point)
//! - NFD: `café.txt` - 'e' U+0065 + combining acute accent U+0301
//!
//! macOS hands out NFD names while Windows and Linux usually use NFC, so
//! without normalization the same visual name would key differently.
//!
//! # Example
//!
//! ```
//! use dirdupes::catalog::path_utils::fold_key;
//!
//! assert_eq!(fold_key("Café.TXT"), fold_key("cafe\u{0301}.txt"));
//! ```

use std::path::{Path, PathBuf};

use unicode_normalization::UnicodeNormalization;

/// Fold a name or path string into its comparison key (NFC, lower-case).
#[must_use]
pub fn fold_key(s: &str) -> String {
    s.nfc().collect::<String>().to_lowercase()
}

/// Fold a path into its comparison key.
///
/// Non-UTF-8 components are replaced lossily, which only affects the key,
/// never the on-disk path kept alongside it.
#[must_use]
pub fn path_key(path: &Path) -> String {
    fold_key(&path.to_string_lossy())
}

/// Check whether `path` lies at or below `prefix`, comparing folded
/// components so `C:\Data` and `c:\data` match.
#[must_use]
pub fn is_within(path: &Path, prefix: &Path) -> bool {
    let path = PathBuf::from(path_key(path));
    let prefix = PathBuf::from(path_key(prefix));
    path.starts_with(prefix)
}

/// Remove duplicate and nested roots so no file is cataloged twice.
///
/// Order of the surviving roots follows their first appearance.
#[must_use]
pub fn collapse_roots(roots: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut kept: Vec<PathBuf> = Vec::with_capacity(roots.len());

    for root in roots {
        if kept.iter().any(|k| is_within(&root, k)) {
            log::debug!("Root {} is already covered, skipping", root.display());
            continue;
        }
        kept.retain(|k| {
            let covered = is_within(k, &root);
            if covered {
                log::debug!("Root {} is nested in {}, dropping it", k.display(), root.display());
            }
            !covered
        });
        kept.push(root);
    }

    kept
}
