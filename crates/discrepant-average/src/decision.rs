//! Outlier-removal decision policies
//!
//! Several estimators flag candidate outliers but leave the final call to
//! the caller — historically an interactive confirmation. [`DecisionPolicy`]
//! abstracts that seam: it is invoked synchronously, once per flagged
//! point, inside the algorithm's control flow. Returning `false` keeps the
//! point in the analysis.

use discrepant_core::Measurement;

/// A synchronous provider of outlier-removal decisions.
pub trait DecisionPolicy {
    /// Should `candidate`, flagged by the named criterion, be removed from
    /// the analysis?
    fn remove_outlier(&self, criterion: &str, candidate: &Measurement) -> bool;

    /// Should the unweighted mean be adopted in place of the weighted one?
    /// Asked by LWM when the two disagree beyond their uncertainties and
    /// the data remain inconsistent. Defaults to keeping the weighted mean.
    fn adopt_unweighted_mean(&self, weighted: &Measurement, unweighted: &Measurement) -> bool {
        let _ = (weighted, unweighted);
        false
    }
}

/// Headless default: every flagged point is kept. Keeping a point never
/// silently changes a result the way auto-rejection would.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoKeep;

impl DecisionPolicy for AutoKeep {
    fn remove_outlier(&self, _criterion: &str, _candidate: &Measurement) -> bool {
        false
    }
}

/// Batch policy: every suggestion is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoAccept;

impl DecisionPolicy for AutoAccept {
    fn remove_outlier(&self, _criterion: &str, _candidate: &Measurement) -> bool {
        true
    }

    fn adopt_unweighted_mean(&self, _weighted: &Measurement, _unweighted: &Measurement) -> bool {
        true
    }
}

impl<F> DecisionPolicy for F
where
    F: Fn(&str, &Measurement) -> bool,
{
    fn remove_outlier(&self, criterion: &str, candidate: &Measurement) -> bool {
        self(criterion, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_keep() {
        let m = Measurement::symmetric(1.0, 0.1);
        assert!(!AutoKeep.remove_outlier("Chauvenet", &m));
        assert!(!AutoKeep.adopt_unweighted_mean(&m, &m));
    }

    #[test]
    fn test_auto_accept() {
        let m = Measurement::symmetric(1.0, 0.1);
        assert!(AutoAccept.remove_outlier("Chauvenet", &m));
        assert!(AutoAccept.adopt_unweighted_mean(&m, &m));
    }

    #[test]
    fn test_closure_policy() {
        let m = Measurement::symmetric(50.0, 0.1);
        let policy = |_: &str, candidate: &Measurement| candidate.value > 40.0;
        assert!(policy.remove_outlier("Peirce", &m));
        assert!(!policy.remove_outlier("Peirce", &Measurement::symmetric(10.0, 0.1)));
        // The adoption question falls back to the default.
        assert!(!policy.adopt_unweighted_mean(&m, &m));
    }
}
