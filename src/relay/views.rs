//! Convenience shapes over puzzle input text.

use anyhow::{Context, Result};

pub fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Whitespace-separated tokens per line. Blank lines become empty rows.
pub fn token_rows(text: &str) -> Vec<Vec<&str>> {
    text.lines()
        .map(|line| line.split_whitespace().collect())
        .collect()
}

/// One integer per non-blank line.
pub fn ints(text: &str) -> Result<Vec<i64>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            line.trim()
                .parse::<i64>()
                .with_context(|| format!("line {} is not an integer: {line:?}", idx + 1))
        })
        .collect()
}

pub fn char_grid(text: &str) -> Vec<Vec<char>> {
    text.lines().map(|line| line.chars().collect()).collect()
}

/// Groups of lines separated by blank lines; empty groups are dropped.
pub fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "A Y\nB Y\nB Z\nB X\n\nC X\nC Y\n";

    #[test]
    fn lines_and_tokens_keep_blank_rows() {
        assert_eq!(lines(SAMPLE).len(), 7);
        let rows = token_rows(SAMPLE);
        assert_eq!(rows[0], vec!["A", "Y"]);
        assert!(rows[4].is_empty());
    }

    #[test]
    fn blocks_split_on_blank_lines() {
        assert_eq!(
            blocks(SAMPLE),
            vec![vec!["A Y", "B Y", "B Z", "B X"], vec!["C X", "C Y"]]
        );
        assert!(blocks("\n\n").is_empty());
    }

    #[test]
    fn ints_skip_blank_and_report_bad_lines() {
        assert_eq!(ints("1\n2\n3\n4\n\n5\n").expect("ints"), vec![1, 2, 3, 4, 5]);
        let err = ints("1\nx\n").expect_err("bad line");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn char_grid_keeps_spaces() {
        assert_eq!(char_grid("A Y\n")[0], vec!['A', ' ', 'Y']);
    }
}
