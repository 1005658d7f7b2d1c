//! Output verification for sequence-tagged log records.
//!
//! Producers write lines built by [`record`]; [`RecordVerifier`] reads the
//! written bytes back and checks that each producer's records are intact and
//! in order. Losses are allowed (overload drops them), reordering is not.

use std::collections::HashMap;

/// `p<producer>:<seq>:<padding>\n`, padded with `.` to at least `len` bytes.
pub fn record(producer: u32, seq: u64, len: usize) -> String {
    let mut line = format!("p{}:{}:", producer, seq);
    while line.len() + 1 < len {
        line.push('.');
    }
    line.push('\n');
    line
}

/// Accumulates verification results across one or more outputs.
#[derive(Default)]
pub struct RecordVerifier {
    /// Last sequence seen per producer
    last_seen: HashMap<u32, u64>,
    /// Records seen per producer
    counts: HashMap<u32, u64>,
    out_of_order: u64,
    duplicates: u64,
    malformed: u64,
    gaps: u64,
}

impl RecordVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every line in `output`.
    pub fn verify(&mut self, output: &[u8]) -> &mut Self {
        for line in output.split(|&b| b == b'\n').filter(|l| !l.is_empty()) {
            match parse(line) {
                Some((producer, seq)) => self.check(producer, seq),
                None => self.malformed += 1,
            }
        }
        self
    }

    fn check(&mut self, producer: u32, seq: u64) {
        *self.counts.entry(producer).or_default() += 1;

        match self.last_seen.get(&producer).copied() {
            Some(last) if seq == last => self.duplicates += 1,
            Some(last) if seq < last => self.out_of_order += 1,
            Some(last) => {
                if seq > last + 1 {
                    self.gaps += 1;
                }
                self.last_seen.insert(producer, seq);
            }
            None => {
                if seq > 0 {
                    self.gaps += 1;
                }
                self.last_seen.insert(producer, seq);
            }
        }
    }

    pub fn stats(&self) -> VerifyStats {
        VerifyStats {
            producers: self.counts.len(),
            records: self.counts.values().sum(),
            out_of_order: self.out_of_order,
            duplicates: self.duplicates,
            malformed: self.malformed,
            gaps: self.gaps,
        }
    }

    /// Records seen from one producer.
    pub fn count(&self, producer: u32) -> u64 {
        self.counts.get(&producer).copied().unwrap_or(0)
    }

    /// No reordering, duplication or torn records.
    pub fn is_consistent(&self) -> bool {
        self.out_of_order == 0 && self.duplicates == 0 && self.malformed == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyStats {
    pub producers: usize,
    pub records: u64,
    pub out_of_order: u64,
    pub duplicates: u64,
    pub malformed: u64,
    pub gaps: u64,
}

fn parse(line: &[u8]) -> Option<(u32, u64)> {
    let line = std::str::from_utf8(line).ok()?;
    let mut parts = line.strip_prefix('p')?.splitn(3, ':');
    let producer = parts.next()?.parse().ok()?;
    let seq = parts.next()?.parse().ok()?;
    let padding = parts.next()?;
    if !padding.bytes().all(|b| b == b'.') {
        return None;
    }
    Some((producer, seq))
}
