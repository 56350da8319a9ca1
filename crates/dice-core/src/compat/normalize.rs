//! Canonical identifiers for resource refs.

use std::borrow::Cow;

use crate::types::Category;

/// Derive the rule key for a resource ref: final path segment without its
/// extension and trailing "thumbnail", minus a trailing "Dice" for `Base`
/// refs, lowercased.
///
/// ```rust,ignore
/// assert_eq!(normalize("/dice/Dice/Dice-SkullDice.svg", Category::Base), "dice-skull");
/// ```
pub fn normalize(resource_ref: &str, category: Category) -> String {
    let segment = resource_ref.rsplit('/').next().unwrap_or(resource_ref);
    let filename = urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment));

    let mut key: &str = match filename.rfind('.') {
        Some(dot) => &filename[..dot],
        None => &filename[..],
    };

    key = strip_suffix_ignore_case(key, "thumbnail");
    if category == Category::Base {
        key = strip_suffix_ignore_case(key, "dice");
    }

    key.to_lowercase()
}

/// Strip `suffix` (lowercase ASCII) from the end of `s`, ignoring ASCII case
fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> &'a str {
    let split = s.len().wrapping_sub(suffix.len());
    if s.len() >= suffix.len()
        && s.is_char_boundary(split)
        && s[split..].eq_ignore_ascii_case(suffix)
    {
        &s[..split]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_refs() {
        assert_eq!(normalize("/dice/Dice/BoxDice.svg", Category::Base), "box");
        assert_eq!(normalize("/dice/Dice/IceCubeDice.svg", Category::Base), "icecube");
        assert_eq!(
            normalize("/dice/Dice/Dice-SkullDice.svg", Category::Base),
            "dice-skull"
        );
        assert_eq!(normalize("/dice/Dice/WhiteDice.svg", Category::Base), "white");
    }

    #[test]
    fn test_normalize_strips_thumbnail_then_dice() {
        assert_eq!(
            normalize("/dice/Thumbnails/GiftDicethumbnail.svg", Category::Base),
            "gift"
        );
        assert_eq!(normalize("SafeDICETHUMBNAIL.png", Category::Base), "safe");
    }

    #[test]
    fn test_dice_suffix_only_stripped_for_base() {
        assert_eq!(
            normalize("/dice/Companions/Mini-Dice.svg", Category::Companion),
            "mini-dice"
        );
        assert_eq!(normalize("/dice/Companions/Mini-Dice.svg", Category::Base), "mini-");
    }

    #[test]
    fn test_normalize_without_extension_or_path() {
        assert_eq!(normalize("RubikDice", Category::Base), "rubik");
        assert_eq!(normalize("", Category::Base), "");
        assert_eq!(normalize("Dice", Category::Base), "");
    }

    #[test]
    fn test_normalize_decodes_percent_escapes() {
        assert_eq!(
            normalize("/dice/Crowns%20%26%20Hats/Top%20Hat.svg", Category::Hat),
            "top hat"
        );
    }
}
