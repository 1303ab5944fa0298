use std::fmt;
use std::path::{Path, PathBuf};

/// Notice shown after a run that skipped inconsistent records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InconsistencyNotice {
    pub skipped: usize,
    /// Where the per-record detail was written, if anywhere.
    pub detail: Option<PathBuf>,
}

impl fmt::Display for InconsistencyNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped == 1 {
            write!(f, "There was 1 record with inconsistent information.")?;
        } else {
            write!(
                f,
                "There were {} records with inconsistent information.",
                self.skipped
            )?;
        }
        write!(f, " These were not used in the creation of the dataset.")?;
        match &self.detail {
            Some(path) => write!(f, " Please see {} for details.", path.display()),
            None => write!(f, " Please see the run log for details."),
        }
    }
}

/// Build the notice for `skipped_count`; `None` when nothing was skipped.
pub fn report(skipped_count: usize, detail: Option<&Path>) -> Option<InconsistencyNotice> {
    (skipped_count > 0).then(|| InconsistencyNotice {
        skipped: skipped_count,
        detail: detail.map(Path::to_path_buf),
    })
}
