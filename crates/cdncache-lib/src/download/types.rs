#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependencyOutcome {
    /// Local file matched the lockfile; nothing was fetched.
    UpToDate,
    Fetched,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub fetched: usize,
    pub up_to_date: usize,
}

impl ReconcileSummary {
    pub fn record(&mut self, outcome: DependencyOutcome) {
        match outcome {
            DependencyOutcome::UpToDate => self.up_to_date += 1,
            DependencyOutcome::Fetched => self.fetched += 1,
        }
    }
}
