//! Diacritic folding for badge text fields.
//!
//! The badge fonts only carry ASCII glyphs, so Czech letters with diacritics
//! are folded to their plain counterparts before layout ("Břicháček" becomes
//! "Brichacek"). Characters without a mapping pass through unchanged.

/// Fold Czech diacritics in a UTF-8 string to ASCII.
pub fn remove_diacritics(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    for ch in src.chars() {
        match fold_czech(ch) {
            Some(plain) => out.push(plain),
            None => out.push(ch),
        }
    }
    out
}

fn fold_czech(ch: char) -> Option<char> {
    let plain = match ch {
        // Lowercase
        'á' => 'a',
        'č' => 'c',
        'ď' => 'd',
        'é' => 'e',
        'ě' => 'e',
        'í' => 'i',
        'ň' => 'n',
        'ó' => 'o',
        'ř' => 'r',
        'š' => 's',
        'ť' => 't',
        'ú' => 'u',
        'ů' => 'u',
        'ý' => 'y',
        'ž' => 'z',
        // Uppercase
        'Á' => 'A',
        'Č' => 'C',
        'Ď' => 'D',
        'É' => 'E',
        'Ě' => 'E',
        'Í' => 'I',
        'Ň' => 'N',
        'Ó' => 'O',
        'Ř' => 'R',
        'Š' => 'S',
        'Ť' => 'T',
        'Ú' => 'U',
        'Ů' => 'U',
        'Ý' => 'Y',
        'Ž' => 'Z',
        _ => return None,
    };
    Some(plain)
}
