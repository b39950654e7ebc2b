use anyhow::Result;
use regex::Regex;

use crate::media::MediaRecord;
use crate::patterns::ReleasePatterns;

/// Candidate token separators, in tie-break order. On equal counts the
/// earlier candidate wins because only a strictly greater count replaces
/// the current choice.
const SEPARATORS: [char; 4] = [' ', '.', '-', '_'];

/// Characters trimmed from both ends of every token.
const TOKEN_TRIM: &[char] = &[' ', '-', '[', ']', '(', ')'];

/// Heuristic file name parser.
///
/// Extracts a title, an optional release year and an optional
/// season/episode (with episode title) from a scene-release style file
/// name stem. Parsing is total: any input yields a [`MediaRecord`], at
/// worst a mostly empty one. The compiled expressions are read-only, so a
/// single parser can serve any number of threads.
pub struct FilenameParser {
    tags: ReleasePatterns,
    year: Regex,
    season: Regex,
    domain: Regex,
    brace_prefix: Regex,
    junk_prefix: Regex,
}

impl FilenameParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tags: ReleasePatterns::new()?,
            // First movie ever was shot in 1888, so accept years since 1800.
            year: Regex::new(r"(?:1[8-9]|[2-9]\d)\d{2}")?,
            season: Regex::new(r"[sS]?(\d{1,2})[eExX](\d{1,2})")?,
            domain: Regex::new(r"^[wW]{2,3}\.[^.]*\.[^.]{3,4}(.*)$")?,
            brace_prefix: Regex::new(r"^[\[\(🃏].*[\]\)🃏](.*)$")?,
            junk_prefix: Regex::new(r"^[^0-9a-zA-Z]*(.*)$")?,
        })
    }

    /// Parse a file name stem (extension already stripped by the caller).
    pub fn parse(&self, stem: &str) -> MediaRecord {
        let mut record = MediaRecord::default();
        let normalized = self.normalize(stem);

        let mut max = 0;
        for sep in SEPARATORS {
            let count = normalized.matches(sep).count();
            if count > max {
                max = count;
                record.separator = sep.to_string();
            }
        }

        // No separator at all: the name has no internal structure.
        if record.separator.is_empty() {
            record.title = title_case(&normalized);
            return record;
        }

        let separator = record.separator.clone();
        let mut done = false;
        let mut seasoned = false;

        for raw in normalized.split(separator.as_str()) {
            let token = raw.trim_matches(TOKEN_TRIM);

            if !done {
                // A year can never be the very first title word: a lone
                // leading number is ambiguous with numeric titles.
                if !record.title.is_empty() {
                    if let Some(year) = self.year.find(token) {
                        record.year = year.as_str().to_string();
                        done = true;
                        continue;
                    }
                }

                if let Some(caps) = self.season.captures(token) {
                    record.season = pad2(&caps[1]);
                    record.episode = pad2(&caps[2]);
                    done = true;
                    seasoned = true;
                    continue;
                }

                if self.tags.matches(token) {
                    done = true;
                    continue;
                }

                record.title.push_str(token);
                record.title.push(' ');
                continue;
            }

            if let Some(year) = self.year.find(token) {
                if record.year.is_empty() {
                    record.year = year.as_str().to_string();
                } else {
                    // Last plausible year wins; the earlier one was
                    // just another title word.
                    record.title.push_str(&record.year);
                    record.title.push(' ');
                    record.year = year.as_str().to_string();
                }
                continue;
            }

            // A season marker may trail the year, e.g. "The Flash 2014 S01E01".
            if let Some(caps) = self.season.captures(token) {
                record.season = pad2(&caps[1]);
                record.episode = pad2(&caps[2]);
                seasoned = true;
                continue;
            }

            // Past the title, a release tag starts the metadata suffix;
            // everything after it is noise.
            if self.tags.matches(token) {
                break;
            }

            if seasoned {
                record.episode_title.push_str(token);
                record.episode_title.push(' ');
            } else {
                record.title.push_str(token);
                record.title.push(' ');
            }
        }

        record.title = title_case(record.title.trim());
        if seasoned {
            record.episode_title = title_case(record.episode_title.trim());
        }

        record
    }

    /// Strip decorative prefixes and collapse " - " runs before tokenizing.
    fn normalize(&self, stem: &str) -> String {
        let n = self.brace_prefix.replace(stem, "$1");
        let n = self.domain.replace(&n, "$1");
        let n = self.junk_prefix.replace(&n, "$1");
        n.replace(" - ", " ")
    }
}

/// Zero-pad a captured digit group to two characters.
fn pad2(digits: &str) -> String {
    format!("{digits:0>2}")
}

/// Uppercase the first letter of every whitespace-delimited word, leaving
/// the rest of each word untouched. Applied once, as a terminal transform.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;

    for ch in s.chars() {
        if ch.is_whitespace() {
            word_start = true;
            out.push(ch);
        } else if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.push(ch);
        }
    }

    out
}
