//! Linux-safe filename sanitization.

const NAME_MAX: usize = 255;

/// Sanitizes a candidate filename for safe use on Linux.
///
/// Path separators, NUL, control characters and whitespace become `_`
/// (runs collapsed); leading/trailing dots and underscores are trimmed and the
/// result is cut to 255 bytes on a char boundary.
pub fn sanitize_filename_for_linux(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let bad = c == '/' || c == '\\' || c.is_control() || c.is_whitespace();
        if bad || c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_separators_and_whitespace() {
        assert_eq!(sanitize_filename_for_linux("a/b\\c d.txt"), "a_b_c_d.txt");
        assert_eq!(sanitize_filename_for_linux("x\0y"), "x_y");
        assert_eq!(sanitize_filename_for_linux("a  /  b"), "a_b");
    }

    #[test]
    fn trims_dots_and_underscores() {
        assert_eq!(sanitize_filename_for_linux("..hidden.txt."), "hidden.txt");
        assert_eq!(sanitize_filename_for_linux("__x__"), "x");
        assert_eq!(sanitize_filename_for_linux(".."), "");
    }

    #[test]
    fn keeps_unicode_and_limits_length() {
        assert_eq!(sanitize_filename_for_linux("频道.txt"), "频道.txt");
        let long = "频".repeat(200);
        let out = sanitize_filename_for_linux(&long);
        assert!(out.len() <= NAME_MAX);
        assert!(out.chars().all(|c| c == '频'));
    }
}
