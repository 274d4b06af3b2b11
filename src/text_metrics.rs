/// Whether `ch` is counted as a double-width glyph in wide-character mode.
pub fn is_wide_char(ch: char) -> bool {
    !ch.is_ascii()
}

pub fn char_width(ch: char, font_size: f32, broad_char: bool) -> f32 {
    if broad_char && is_wide_char(ch) {
        font_size * 2.0
    } else {
        font_size
    }
}

/// Estimated advance of `text`: one `font_size` per character, two for wide
/// characters when `broad_char` is on.
pub fn measure_text_width(text: &str, font_size: f32, broad_char: bool) -> f32 {
    if font_size <= 0.0 {
        return 0.0;
    }
    text.chars()
        .map(|ch| char_width(ch, font_size, broad_char))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_one_em_per_char() {
        assert_eq!(measure_text_width("abc", 10.0, true), 30.0);
        assert_eq!(measure_text_width("abc", 10.0, false), 30.0);
    }

    #[test]
    fn wide_chars_double_only_in_broad_mode() {
        assert_eq!(measure_text_width("日本語", 10.0, true), 60.0);
        assert_eq!(measure_text_width("日本語", 10.0, false), 30.0);
        assert_eq!(measure_text_width("Java入門", 10.0, true), 80.0);
    }

    #[test]
    fn empty_or_zero_size_measures_zero() {
        assert_eq!(measure_text_width("", 16.0, true), 0.0);
        assert_eq!(measure_text_width("abc", 0.0, true), 0.0);
    }
}
