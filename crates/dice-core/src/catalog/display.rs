//! Name and path formatting for presentation.

/// Names that need punctuation the file names cannot carry.
/// Matched against the lowercased, space-separated name.
const DISPLAY_EXCEPTIONS: &[(&str, &str)] = &[
    ("kings crown", "King's Crown"),
    ("princes crown", "Prince's Crown"),
    ("kings cape", "King's Cape"),
];

const THUMBNAIL_SUFFIX: &str = "thumbnail";
const THUMBNAIL_DIR: &str = "/dice/Thumbnails";

/// Name used for keyword ranking: lowercased, first "thumbnail" removed
pub fn ranking_name(raw: &str) -> String {
    raw.to_lowercase().replacen(THUMBNAIL_SUFFIX, "", 1)
}

/// User-facing name for a raw catalog name.
///
/// `"KingsCrownthumbnail"` becomes `"King's Crown"`, `"BlueBackground"`
/// becomes `"Blue"`, `"BoxDice"` becomes `"Box"`.
pub fn display_name(raw: &str) -> String {
    let mut name = raw.to_string();

    if name.to_ascii_lowercase().ends_with(THUMBNAIL_SUFFIX) {
        name.truncate(name.len() - THUMBNAIL_SUFFIX.len());
    }

    if name.to_ascii_lowercase().contains("background") {
        name = remove_ignore_case(&name, "background").trim().to_string();
    }

    let lower = name.to_ascii_lowercase();
    if lower.contains("dice") && lower.contains("skull") {
        name = "Dice-Skull".to_string();
    } else if lower.contains("dice") {
        name = remove_ignore_case(&name, "dice").trim().to_string();
    }

    let name = split_camel_case(&name);
    let lower = name.to_lowercase();
    DISPLAY_EXCEPTIONS
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, shown)| shown.to_string())
        .unwrap_or(name)
}

/// Thumbnail location for a resource: `/dice/Thumbnails/<stem>thumbnail<ext>`.
/// Refs without an extension are returned unchanged.
pub fn thumbnail_path(resource_ref: &str) -> String {
    let filename = resource_ref.rsplit('/').next().unwrap_or(resource_ref);
    match filename.rfind('.') {
        Some(dot) => {
            let (stem, ext) = filename.split_at(dot);
            format!("{}/{}{}{}", THUMBNAIL_DIR, stem, THUMBNAIL_SUFFIX, ext)
        }
        None => resource_ref.to_string(),
    }
}

/// Remove every ASCII-case-insensitive occurrence of `pat` (lowercase ASCII)
fn remove_ignore_case(s: &str, pat: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `s`
    let lower = s.to_ascii_lowercase();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while let Some(pos) = lower[i..].find(pat) {
        out.push_str(&s[i..i + pos]);
        i += pos + pat.len();
    }
    out.push_str(&s[i..]);
    out
}

/// Insert a space at every lowercase-to-uppercase boundary
fn split_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if let Some(p) = prev {
            if p.is_ascii_lowercase() && c.is_ascii_uppercase() {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
