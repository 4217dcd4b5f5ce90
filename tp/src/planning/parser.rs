//! ResponseParser - reads task blocks out of a model reply
//!
//! A block starts at a `**Heading:**` marker and runs to the next
//! `**Heading:**` marker or the end of the reply. Inside a block each field
//! value is the text between its marker and the next expected marker, so a
//! stray marker out of order is simply part of the value it sits in. Blocks
//! missing any marker, or whose heading trims to nothing, are dropped. Other
//! fields may be empty.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::grammar::Field;
use crate::domain::TaskRecord;

/// Most tasks taken from a single reply
pub const MAX_TASKS: usize = 6;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = Field::ORDER.iter().map(|f| regex::escape(f.marker())).collect();
    Regex::new(&alternatives.join("|")).expect("Invalid field marker regex")
});

/// A marker occurrence in the reply
#[derive(Debug, Clone, Copy)]
struct Marker {
    field: Field,
    start: usize,
    end: usize,
}

/// Extracts [`TaskRecord`]s from raw reply text
#[derive(Debug, Clone)]
pub struct ResponseParser {
    max_tasks: usize,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self { max_tasks: MAX_TASKS }
    }
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser that stops after `max_tasks` blocks
    pub fn with_max_tasks(max_tasks: usize) -> Self {
        Self { max_tasks }
    }

    pub fn max_tasks(&self) -> usize {
        self.max_tasks
    }

    /// Parse every complete task block, in reply order, up to the limit
    ///
    /// Never fails: unparseable input yields fewer (or zero) records.
    pub fn parse(&self, reply: &str) -> Vec<TaskRecord> {
        debug!(reply_len = reply.len(), max_tasks = self.max_tasks, "parse: called");
        let markers = scan_markers(reply);

        let heading_positions: Vec<usize> = markers
            .iter()
            .enumerate()
            .filter(|(_, m)| m.field == Field::Heading)
            .map(|(idx, _)| idx)
            .collect();

        let mut records = Vec::new();
        for (block_idx, &first) in heading_positions.iter().enumerate() {
            if records.len() >= self.max_tasks {
                debug!(
                    skipped = heading_positions.len() - block_idx,
                    "parse: task limit reached, ignoring remaining blocks"
                );
                break;
            }

            let next = heading_positions.get(block_idx + 1).copied();
            let block_end = next.map(|idx| markers[idx].start).unwrap_or(reply.len());
            let block_markers = &markers[first..next.unwrap_or(markers.len())];

            match parse_block(reply, block_markers, block_end) {
                Ok(record) => records.push(record),
                Err(reason) => warn!(block = block_idx + 1, %reason, "parse: dropping incomplete task block"),
            }
        }

        debug!(count = records.len(), "parse: complete");
        records
    }
}

/// All marker occurrences in order of position
fn scan_markers(reply: &str) -> Vec<Marker> {
    MARKER_RE
        .find_iter(reply)
        .filter_map(|m| {
            let field = Field::ORDER.iter().copied().find(|f| f.marker() == m.as_str())?;
            Some(Marker {
                field,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect()
}

/// Read one block; `markers[0]` is its Heading marker
fn parse_block(reply: &str, markers: &[Marker], block_end: usize) -> Result<TaskRecord, String> {
    let mut values: Vec<&str> = Vec::with_capacity(Field::ORDER.len());
    let mut expected = Field::ORDER.iter().copied().skip(1);
    let mut want = expected.next();
    let mut value_start = markers[0].end;

    for marker in &markers[1..] {
        if Some(marker.field) == want {
            values.push(reply[value_start..marker.start].trim());
            value_start = marker.end;
            want = expected.next();
            if want.is_none() {
                break;
            }
        }
    }

    if let Some(missing) = want {
        return Err(format!("missing {} marker", missing.marker()));
    }
    values.push(reply[value_start..block_end].trim());

    if values[0].is_empty() {
        return Err(format!("empty value after {}", Field::Heading.marker()));
    }

    Ok(TaskRecord {
        heading: values[0].to_string(),
        priority: values[1].to_uppercase(),
        timeline: values[2].to_string(),
        dependencies: values[3].to_string(),
        due_date: values[4].to_string(),
        matter: values[5].to_string(),
    })
}
