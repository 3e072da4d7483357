use std::io::{self, BufRead};

/// Split a document or query line into words.
///
/// Words are maximal runs of non-whitespace characters, returned exactly as written:
/// no case folding, no punctuation stripping. An empty or blank line yields no words.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Call `each` with every line of `input`, without its `\n` or `\r\n` terminator.
///
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the stream.
pub(crate) fn for_each_line<R, F>(mut input: R, mut each: F) -> io::Result<()>
where
    R: BufRead,
    F: FnMut(String),
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        each(String::from_utf8_lossy(&buf).into_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_lines(input: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for_each_line(input, |line| lines.push(line)).unwrap();
        lines
    }

    #[test]
    fn lines_drop_terminators() {
        assert_eq!(collect_lines(b"a b\r\n\nc"), ["a b", "", "c"]);
        assert!(collect_lines(b"").is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        assert_eq!(collect_lines(b"ok\n\xff bad\n"), ["ok", "\u{FFFD} bad"]);
    }

    #[test]
    fn splits_on_any_whitespace() {
        let words: Vec<_> = tokenize("  alpha\tbeta  gamma\n").collect();
        assert_eq!(words, ["alpha", "beta", "gamma"]);
    }

    #[test]
    fn keeps_case_and_punctuation() {
        let words: Vec<_> = tokenize("Rust rust rust!").collect();
        assert_eq!(words, ["Rust", "rust", "rust!"]);
    }

    #[test]
    fn blank_line_has_no_words() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("   ").count(), 0);
    }
}
