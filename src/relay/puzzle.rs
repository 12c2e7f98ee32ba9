use crate::error::RelayError;
use anyhow::Result;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

pub const FIRST_YEAR: i32 = 2015;
pub const LAST_DAY: u32 = 25;

/// One puzzle instance, validated against the event calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuzzleKey {
    year: i32,
    day: u32,
}

impl PuzzleKey {
    pub fn new(year: i32, day: u32, current_year: i32) -> Result<Self> {
        if !(1..=LAST_DAY).contains(&day) || year < FIRST_YEAR || year > current_year {
            return Err(RelayError::Configuration(format!(
                "{year} / {day} is not a valid Advent of Code date"
            ))
            .into());
        }
        Ok(Self { year, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Recover year and day from a solution path such as `2022/day07.rs`:
    /// the year is the first `20xx` anywhere in the path, the day is the
    /// digits of the file stem.
    pub fn infer_from_path(path: &Path, current_year: i32) -> Result<Self> {
        static YEAR_RE: OnceLock<Regex> = OnceLock::new();
        let year_re = YEAR_RE.get_or_init(|| Regex::new(r"(20\d{2})").expect("valid regex"));

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let digits: String = stem.chars().filter(char::is_ascii_digit).collect();
        let day = digits.parse::<u32>().map_err(|_| {
            RelayError::Configuration(format!("could not determine day from file {stem}"))
        })?;

        let full = path.to_string_lossy();
        let year = year_re
            .captures(&full)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .ok_or_else(|| {
                RelayError::Configuration(format!(
                    "could not determine year from path: {}",
                    path.display()
                ))
            })?;

        Self::new(year, day, current_year)
    }

    pub fn page_url(&self, base_url: &str) -> String {
        format!("{base_url}/{}/day/{}", self.year, self.day)
    }

    pub fn input_url(&self, base_url: &str) -> String {
        format!("{}/input", self.page_url(base_url))
    }

    pub fn answer_url(&self, base_url: &str) -> String {
        format!("{}/answer", self.page_url(base_url))
    }

    pub fn cache_file_name(&self) -> String {
        format!("{}_{:02}.txt", self.year, self.day)
    }
}

impl fmt::Display for PuzzleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} day {}", self.year, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Part {
    One,
    Two,
}

impl Part {
    pub fn level(self) -> u8 {
        match self {
            Part::One => 1,
            Part::Two => 2,
        }
    }
}

impl TryFrom<u8> for Part {
    type Error = RelayError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Part::One),
            2 => Ok(Part::Two),
            other => Err(RelayError::Configuration(format!(
                "puzzle part must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}
