//! Console table helpers.

/// Fit `text` into `width` characters, ending with `...` when cut.
pub(crate) fn ellipsize(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    let head: String = text.chars().take(keep).collect();
    format!("{head}...")
}

pub(crate) fn banner(title: &str, width: usize) {
    println!();
    println!("{}", "=".repeat(width));
    println!("{title}");
    println!("{}", "=".repeat(width));
    println!();
}

pub(crate) fn rule(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Integer part of a score, as shown in console tables.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn whole(score: f64) -> i64 {
    score.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(ellipsize("seo", 40), "seo");
        assert_eq!(ellipsize(&"a".repeat(40), 40), "a".repeat(40));
    }

    #[test]
    fn long_text_is_cut_with_ellipsis() {
        let cut = ellipsize(&"b".repeat(60), 40);
        assert_eq!(cut.chars().count(), 40);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn whole_truncates_toward_zero() {
        assert_eq!(whole(12.9), 12);
        assert_eq!(whole(-3.7), -3);
    }
}
