//! Whitespace squeezing for plain text. Structural only; no target-size logic.

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;

use crate::artifact::{CompressedArtifact, SourceArtifact};
use crate::profile::Level;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Everything on one line, words separated by single spaces.
    SingleLine,
    /// One space between words, blank lines removed, line breaks kept.
    Lines,
}

impl TextMode {
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Extreme => TextMode::SingleLine,
            Level::High | Level::Normal => TextMode::Lines,
        }
    }
}

/// UTF-8 decode that silently drops invalid sequences.
fn decode(data: &[u8]) -> String {
    let mut text = String::with_capacity(data.len());
    for chunk in data.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

pub fn squeeze(text: &str, mode: TextMode) -> String {
    match mode {
        TextMode::SingleLine => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        TextMode::Lines => text
            .lines()
            .map(|line| WHITESPACE_RUN.replace_all(line.trim(), " "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn compress(source: &SourceArtifact, mode: TextMode) -> Result<CompressedArtifact> {
    let text = decode(&source.data);
    let squeezed = squeeze(&text, mode);
    log::info!(
        "Text squeezed: {} lines -> {} lines",
        text.lines().count(),
        squeezed.lines().count()
    );
    Ok(CompressedArtifact::new(
        squeezed.into_bytes(),
        source.extension(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_collapses_runs_and_blank_lines() {
        let input = "  hello    world \n\n\t\nsecond\t\tline  \n";
        assert_eq!(squeeze(input, TextMode::Lines), "hello world\nsecond line");
    }

    #[test]
    fn test_single_line_joins_trimmed_lines() {
        let input = "  first line \n\n  second   line\r\nthird";
        assert_eq!(
            squeeze(input, TextMode::SingleLine),
            "first line second   line third"
        );
    }

    #[test]
    fn test_blank_only_input_becomes_empty() {
        assert_eq!(squeeze("\n\n   \n\t\n", TextMode::Lines), "");
        assert_eq!(squeeze("\n\n   \n\t\n", TextMode::SingleLine), "");
    }

    #[test]
    fn test_lines_is_idempotent() {
        let input = "a  b\n\n  c\td \n e\r\n\r\nf   ";
        let once = squeeze(input, TextMode::Lines);
        assert_eq!(squeeze(&once, TextMode::Lines), once);
    }

    #[test]
    fn test_invalid_utf8_is_dropped() {
        let source = SourceArtifact::new("x.txt", b"ab\xffcd\n\n e".to_vec());
        let out = compress(&source, TextMode::Lines).unwrap();
        assert_eq!(out.data, b"abcd\ne");
        assert_eq!(out.extension.as_deref(), Some("txt"));
    }

    #[test]
    fn test_word_content_is_preserved() {
        let input = "the quick\n\n brown  fox\njumps";
        let words = |s: &str| s.split_whitespace().map(str::to_string).collect::<Vec<_>>();
        for mode in [TextMode::Lines, TextMode::SingleLine] {
            assert_eq!(words(&squeeze(input, mode)), words(input));
        }
    }
}
