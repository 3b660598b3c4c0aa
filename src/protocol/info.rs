//! Protocol output for a running search.
//!
//! `InfoWriter` is the `Reporter` the front end hands to a search: every
//! candidate and progress step becomes an `info` line, and `finish` writes
//! the closing statistics and `bestpath`.

use std::io::{self, Write};

use crate::board::Board;
use crate::search::{Candidate, Reporter, SearchResult};

use super::notation::format_path;

pub struct InfoWriter<W: Write> {
    out: W,
    /// Last progress reported, in whole percent.
    last_percent: i64,
}

impl<W: Write> InfoWriter<W> {
    pub fn new(out: W) -> Self {
        InfoWriter { out, last_percent: -1 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes `info nodes N time MS` and the `bestpath` line.
    pub fn finish(&mut self, result: &SearchResult) -> io::Result<()> {
        writeln!(
            self.out,
            "info nodes {} time {}",
            result.nodes,
            result.elapsed.as_millis()
        )?;
        match &result.best {
            Some(best) => writeln!(self.out, "bestpath {}", format_path(&best.path))?,
            None => writeln!(self.out, "bestpath none")?,
        }
        self.out.flush()
    }
}

impl<W: Write> Reporter for InfoWriter<W> {
    fn candidate(&mut self, candidate: &Candidate, _board: &Board) {
        let _ = writeln!(
            self.out,
            "info candidate combos {} steps {} quality {:.3} path {} text {}",
            candidate.combos,
            candidate.path.len(),
            candidate.quality,
            format_path(&candidate.path),
            candidate.text
        );
        let _ = self.out.flush();
    }

    fn progress(&mut self, fraction: f64) {
        let percent = (fraction * 100.0).floor() as i64;
        if percent > self.last_percent {
            self.last_percent = percent;
            let _ = writeln!(self.out, "info progress {:.2}", fraction);
            let _ = self.out.flush();
        }
    }
}
