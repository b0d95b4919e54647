//! Filename-safe encoding of image text lines
//!
//! Each line becomes one path segment of an image URL. Characters that would
//! collide with URL syntax are rewritten so the token is safe to use as a
//! filename. The mapping is not reversible.

/// Encode text lines into a single `/`-separated, filename-safe token
pub fn encode<S: AsRef<str>>(lines: &[S]) -> String {
    let encoded: Vec<String> = lines
        .iter()
        .map(|line| encode_line(line.as_ref()))
        .collect();

    let slug = encoded.join("/");
    if slug.is_empty() {
        "_".to_string()
    } else {
        slug
    }
}

fn encode_line(line: &str) -> String {
    if line.is_empty() {
        return "_".to_string();
    }

    let mut encoded = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '_' => encoded.push_str("__"),
            '-' => encoded.push_str("--"),
            ' ' => encoded.push('_'),
            '?' => encoded.push_str("~q"),
            '&' => encoded.push_str("~a"),
            '%' => encoded.push_str("~p"),
            '#' => encoded.push_str("~h"),
            '/' => encoded.push_str("~s"),
            '\\' => encoded.push_str("~b"),
            '<' => encoded.push_str("~l"),
            '>' => encoded.push_str("~g"),
            '"' => encoded.push_str("''"),
            '\n' => encoded.push_str("~n"),
            other => encoded.push(other),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_spaces_and_separators() {
        assert_eq!(encode(&["tests code", "in production"]), "tests_code/in_production");
        assert_eq!(encode(&["a_b", "c-d"]), "a__b/c--d");
    }

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(encode(&["why?"]), "why~q");
        assert_eq!(encode(&["100% #1"]), "100~p_~h1");
        assert_eq!(encode(&["a/b\\c"]), "a~sb~bc");
        assert_eq!(encode(&["<tag> & \"quote\""]), "~ltag~g_~a_''quote''");
        assert_eq!(encode(&["two\nlines"]), "two~nlines");
    }

    #[test]
    fn test_encode_empty_lines() {
        assert_eq!(encode(&["", "this is a wide image"]), "_/this_is_a_wide_image");
        assert_eq!(encode::<&str>(&[]), "_");
    }
}
