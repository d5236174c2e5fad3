use std::path::PathBuf;

/// Successful end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Linear progression of one invocation; `Failed` is reachable from any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    ConfigResolved,
    Requested,
    ResponseParsed,
    Downloading,
    Done,
    Failed,
}

impl RunPhase {
    /// The phase that follows on success. Terminal phases stay put.
    pub fn next(self) -> RunPhase {
        match self {
            RunPhase::Start => RunPhase::ConfigResolved,
            RunPhase::ConfigResolved => RunPhase::Requested,
            RunPhase::Requested => RunPhase::ResponseParsed,
            RunPhase::ResponseParsed => RunPhase::Downloading,
            RunPhase::Downloading => RunPhase::Done,
            RunPhase::Done => RunPhase::Done,
            RunPhase::Failed => RunPhase::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Done | RunPhase::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_advance_linearly() {
        let mut phase = RunPhase::Start;
        let mut seen = vec![phase];
        while !phase.is_terminal() {
            phase = phase.next();
            seen.push(phase);
        }

        assert_eq!(
            seen,
            vec![
                RunPhase::Start,
                RunPhase::ConfigResolved,
                RunPhase::Requested,
                RunPhase::ResponseParsed,
                RunPhase::Downloading,
                RunPhase::Done,
            ]
        );
        assert_eq!(RunPhase::Failed.next(), RunPhase::Failed);
    }
}
