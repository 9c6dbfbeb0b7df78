//! ASCII folding and fixed-width field formatting.

/// Folds a string to upper-case ASCII.
///
/// Accented Latin letters lose their diacritic, combining marks are
/// stripped, and any other non-ASCII code point is dropped, mirroring a
/// decompose-then-encode-ascii-ignore pipeline. The output is always pure
/// ASCII, so applying the fold twice is a no-op.
pub fn fold(text: &str) -> String {
    text.chars().filter_map(fold_char).collect()
}

/// Folds and truncates to at most `max_len` characters.
pub fn fold_and_truncate(text: &str, max_len: usize) -> String {
    let mut folded = fold(text);
    // The fold output is ASCII, so byte truncation is character truncation.
    folded.truncate(max_len);
    folded
}

fn fold_char(c: char) -> Option<char> {
    if c.is_ascii() {
        return Some(c.to_ascii_uppercase());
    }
    // Combining diacritical marks
    if ('\u{0300}'..='\u{036F}').contains(&c) {
        return None;
    }
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'ā' | 'ă'
        | 'ą' => 'A',
        'ç' | 'Ç' | 'ć' | 'č' => 'C',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'E',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' | 'ī' | 'į' => 'I',
        'ñ' | 'Ñ' | 'ń' | 'ň' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'ō' | 'ő' => 'O',
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' | 'ū' | 'ů' => 'U',
        'ý' | 'ÿ' | 'Ý' => 'Y',
        'š' | 'ś' => 'S',
        'ž' | 'ź' | 'ż' => 'Z',
        _ => return None,
    };
    Some(base)
}

/// Formats a postal code as a 5-digit zero-padded string.
///
/// `0` is the "unset" sentinel and renders as an empty string rather than
/// `00000`. Codes longer than 5 digits are truncated to their first 5.
pub fn format_postcode(code: u32) -> String {
    if code == 0 {
        return String::new();
    }
    let mut padded = format!("{code:05}");
    padded.truncate(5);
    padded
}

/// Renders a price with exactly two fraction digits and a comma separator,
/// e.g. `31.5` becomes `"31,50"`. Non-finite values render as `"0,00"`.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "0,00".to_string();
    }
    format!("{value:.2}").replace('.', ",")
}

/// Parses a price accepting either a comma or a dot as decimal separator.
/// Empty or unparsable input yields `0.0`.
pub fn parse_price(text: &str) -> f64 {
    text.trim().replace(',', ".").parse::<f64>().unwrap_or(0.0)
}
