//! URL slugs derived from product names.
//!
//! `"Crème Brûlée & Co. 50%"` becomes `"creme-brulee-and-co-50-percent"`.
//! The mapping is lossy and not unique; two names can share a slug.

use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"));

fn transliterate(c: char) -> Option<&'static str> {
    let replacement = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ß' => "ss",
        'ś' | 'š' | 'ş' => "s",
        'ť' | 'ţ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'þ' => "th",
        '&' => " and ",
        '$' => " dollar ",
        '%' => " percent ",
        '€' => " euro ",
        '£' => " pound ",
        '¥' => " yen ",
        '©' => " c ",
        '®' => " r ",
        '™' => " tm ",
        '<' => " less ",
        '>' => " greater ",
        '|' => " or ",
        _ => return None,
    };
    Some(replacement)
}

/// Lowercase, transliterated, hyphen-separated form of `name`.
///
/// Characters with no ASCII rendering are dropped. Returns an empty string
/// when nothing survives.
pub fn slugify(name: &str) -> String {
    let mut ascii = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        match transliterate(c) {
            Some(replacement) => ascii.push_str(replacement),
            None => ascii.push(c),
        }
    }

    NON_SLUG
        .replace_all(&ascii, "-")
        .trim_matches('-')
        .to_string()
}
