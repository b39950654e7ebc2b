use anyhow::Result;
use regex::Regex;

/// Release-metadata vocabulary found in scene and torrent file names.
///
/// One compiled pattern per semantic category. A token that matches any
/// category is release metadata, not part of a title. Case sensitivity is
/// mixed on purpose: quality tags like BluRay come in every spelling, while
/// plain codec tokens (MP3, AAC, MKV) stay exact so ordinary title words
/// are not swallowed.
pub struct ReleasePatterns {
    patterns: Vec<Regex>,
}

impl ReleasePatterns {
    pub fn new() -> Result<Self> {
        let patterns = vec![
            // Rip source / quality
            Regex::new(
                r"(?:PPV\.)?[HP]DTV|(?:HD)?CAM|hd-?ts|(?:PPV )?WEB-?DL(?: DVDRip)?|(?:D[vV][dD]|H[dD]|Cam|W[EB]B|B[DR])(?:(?i)rip)|(?:(?i)blu[-]?ray)|(?:(?i)telesync)|DvDScr|hdtv|PPV",
            )?,
            // Audio codec / channel layout
            Regex::new(
                r"MP3|DD5\.?1|Dual[\- ]Audio|LiNE|DTS|AAC[.-]LC|AAC(?:\.?2\.0|2)?|AC3(?:\.5\.1)?|Dual|Audio",
            )?,
            // Video codec
            Regex::new(r"xvid|[hx]\.?26[45](?:(?i)-fov|-w4f)?")?,
            // Language tag
            Regex::new(r"(?i)hindi|(?:rus|ita)(?:\.eng|$)|eng$")?,
            // File size annotation
            Regex::new(r"[1-9]\d+(?:\.\d+)?(?:(?i)gb|mb)")?,
            // Cut / edition
            Regex::new(r"(?i)EXTENDED(:?.CUT)?")?,
            // Resolution
            Regex::new(r"[1-9]\d{2,3}p")?,
            // Stereoscopic format
            Regex::new(r"(?:Half-)?SBS")?,
            // Container named in the stem
            Regex::new(r"MKV|AVI|MP4")?,
            // Miscellaneous scene tags
            Regex::new(
                r"unknown_release_type|UpScaled|iNTERNAL|CONVERT|[hH]ard[sS]ub|READNFO|PROPER|REPACK|UNRATED|(?:(?i)rarbg)|(?:(?i)hevc)|AMZN|PDTV|1CD|WEB|NBY|R[0-9]|TS|HC|WS|3D",
            )?,
        ];

        Ok(Self { patterns })
    }

    /// Whether a token matches any known release-tag category.
    pub fn matches(&self, token: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(token))
    }
}
