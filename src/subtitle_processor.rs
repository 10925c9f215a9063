use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use log::{warn, debug};

use crate::time_resolver::format_timestamp;

// @module: SubRip cue model and overlap consolidation

// @struct: Single timed subtitle cue
#[derive(Debug, Clone)]
pub struct Cue {
    // @field: 1-based sequence number, assigned after merging
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Dialogue text, line breaks already resolved
    pub text: String,
}

impl Cue {
    /// Creates a new cue; upstream data does not guarantee start <= end and
    /// degenerate zero-length cues are legal, so nothing is validated here.
    pub fn new(seq_num: usize, start_ms: u64, end_ms: u64, text: String) -> Self {
        Cue {
            seq_num,
            start_ms,
            end_ms,
            text,
        }
    }

    /// Convert start time to a formatted SubRip timestamp
    pub fn format_start(&self) -> String {
        // Times are u64 by the time they reach a cue, so formatting cannot fail
        format_timestamp(self.start_ms as i64).unwrap_or_default()
    }

    /// Convert end time to a formatted SubRip timestamp
    pub fn format_end(&self) -> String {
        format_timestamp(self.end_ms as i64).unwrap_or_default()
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start(), self.format_end())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Collection of cues in final emission order
#[derive(Debug)]
pub struct CueCollection {
    /// Source document path, for diagnostics
    pub source_file: PathBuf,

    /// Merged cues, ascending by start time
    pub entries: Vec<Cue>,
}

impl CueCollection {
    /// Create an empty collection
    pub fn new(source_file: PathBuf) -> Self {
        CueCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Build the final collection from unordered resolved cues.
    ///
    /// Sorts, folds overlapping neighbors together, and renumbers the result
    /// sequentially from 1.
    pub fn from_unmerged(source_file: PathBuf, cues: Vec<Cue>) -> Self {
        let entries = merge_overlapping_cues(cues);
        CueCollection {
            source_file,
            entries,
        }
    }

    /// Render the whole collection as SubRip text
    pub fn to_srt_string(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            // Display on Cue emits the numbered block plus trailing blank line
            out.push_str(&entry.to_string());
        }
        out
    }

    /// Write the collection to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }
}

impl fmt::Display for CueCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Cue Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}

/// Sort cues and consolidate overlapping neighbors into single entries.
///
/// The sort is stable: cues with equal start times keep their input order so
/// output is reproducible. The scan merges strictly overlapping pairs only -
/// `next.start_ms < current.end_ms` - which means touching cues stay
/// separate, and a cue covered by two earlier non-adjacent cues is not
/// retroactively merged. The single pass is intentional; a full interval
/// union would change the observable grouping and ordering of merged text.
pub fn merge_overlapping_cues(mut cues: Vec<Cue>) -> Vec<Cue> {
    if cues.is_empty() {
        warn!("No cues to merge");
        return cues;
    }

    cues.sort_by_key(|cue| cue.start_ms);

    let mut merged: Vec<Cue> = Vec::with_capacity(cues.len());
    let mut iter = cues.into_iter();
    let mut current = iter.next().expect("non-empty cue list");

    for next in iter {
        if next.start_ms < current.end_ms {
            debug!(
                "Merging overlapping cues: [{} - {}] absorbs [{} - {}]",
                current.start_ms, current.end_ms, next.start_ms, next.end_ms
            );
            current.end_ms = current.end_ms.max(next.end_ms);
            current.text.push('\n');
            current.text.push_str(&next.text);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    // Renumber so the output is sequential from 1
    for (i, cue) in merged.iter_mut().enumerate() {
        cue.seq_num = i + 1;
    }

    merged
}
