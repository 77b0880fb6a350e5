//! Console progress for the `fetch` command.
//!
//! One line per attempted (form, office) pair: the prefix is written and flushed
//! before the request, the outcome is appended once it returns. Forms whose
//! office list could not be fetched get a single `skipped:` line.

use processing_times_core::contract::{ApiError, PairOutcome, Progress};
use std::io::{self, Write};

/// Prints one `FORM     | OFFICE ...... Done` line per attempted pair.
pub struct ConsoleProgress<W: Write = Box<dyn Write>> {
    out: W,
}

impl ConsoleProgress {
    pub fn stdout() -> Self {
        ConsoleProgress::new(Box::new(io::stdout()))
    }

    /// Used when the report itself is streamed on stdout.
    pub fn stderr() -> Self {
        ConsoleProgress::new(Box::new(io::stderr()))
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        ConsoleProgress { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// Console output is best effort.
impl<W: Write> Progress for ConsoleProgress<W> {
    fn form_skipped(&mut self, form: &str, error: &ApiError) {
        let _ = writeln!(self.out, "{form:<8} | skipped: {error}");
    }

    fn pair_started(&mut self, form: &str, office: &str) {
        let _ = write!(self.out, "{form:<8} | {office:<35} ...... ");
        let _ = self.out.flush();
    }

    fn pair_finished(&mut self, _form: &str, _office: &str, outcome: PairOutcome) {
        let status = match outcome {
            PairOutcome::Done { .. } => "Done",
            PairOutcome::Failed => "Error",
        };
        let _ = writeln!(self.out, "{status}");
    }
}
