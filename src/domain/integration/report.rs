//! Persistence plan bookkeeping for successful registrations.
//!
//! Each step of the plan runs independently. Failures never abort the plan;
//! they are collected here so the workflow can log them and surface a single
//! advisory warning to the caller.

use std::fmt;

/// Warning returned when the provider response lacked the id or token.
pub const MISSING_FACT_WARNING: &str =
    "Company registered with the fiscal provider, but the id/token needed for persistence could not be identified.";

/// Named steps of the post-registration persistence plan, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistenceStep {
    InsertIntegration,
    MarkCompanyIntegrated,
    UpdateCertificateWindow,
    DeleteIntegrationErrors,
}

impl PersistenceStep {
    /// The plan, in the order it runs.
    pub const PLAN: [PersistenceStep; 4] = [
        PersistenceStep::InsertIntegration,
        PersistenceStep::MarkCompanyIntegrated,
        PersistenceStep::UpdateCertificateWindow,
        PersistenceStep::DeleteIntegrationErrors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersistenceStep::InsertIntegration => "insert_integration",
            PersistenceStep::MarkCompanyIntegrated => "mark_company_integrated",
            PersistenceStep::UpdateCertificateWindow => "update_certificate_window",
            PersistenceStep::DeleteIntegrationErrors => "delete_integration_errors",
        }
    }

    /// Advisory warning raised when this step fails, if the step is caller-visible.
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            PersistenceStep::InsertIntegration => Some(
                "Company registered with the fiscal provider, but the integration data could not be saved.",
            ),
            PersistenceStep::MarkCompanyIntegrated => Some(
                "Company registered with the fiscal provider, but the integration status could not be updated.",
            ),
            PersistenceStep::UpdateCertificateWindow => Some(
                "Company registered with the fiscal provider, but the certificate dates could not be updated.",
            ),
            PersistenceStep::DeleteIntegrationErrors => None,
        }
    }
}

impl fmt::Display for PersistenceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed step and the reason it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: PersistenceStep,
    pub reason: String,
}

/// Accumulates the outcome of the persistence plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistenceReport {
    completed: Vec<PersistenceStep>,
    failures: Vec<StepFailure>,
    warning: Option<String>,
}

impl PersistenceReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report for a response that carried no persistable fact.
    pub fn missing_fact() -> Self {
        Self {
            warning: Some(MISSING_FACT_WARNING.to_string()),
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, step: PersistenceStep) {
        self.completed.push(step);
    }

    /// Records a failure. The first warning-bearing failure wins.
    pub fn record_failure(&mut self, step: PersistenceStep, reason: impl Into<String>) {
        if self.warning.is_none() {
            self.warning = step.warning().map(str::to_string);
        }
        self.failures.push(StepFailure {
            step,
            reason: reason.into(),
        });
    }

    pub fn completed(&self) -> &[PersistenceStep] {
        &self.completed
    }

    pub fn failures(&self) -> &[StepFailure] {
        &self.failures
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn into_warning(self) -> Option<String> {
        self.warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_run_has_no_warning() {
        let mut report = PersistenceReport::new();
        for step in PersistenceStep::PLAN {
            report.record_success(step);
        }
        assert!(report.warning().is_none());
        assert_eq!(report.completed().len(), 4);
    }

    #[test]
    fn first_failure_sets_the_warning() {
        let mut report = PersistenceReport::new();
        report.record_success(PersistenceStep::InsertIntegration);
        report.record_failure(PersistenceStep::MarkCompanyIntegrated, "timeout");
        report.record_failure(PersistenceStep::UpdateCertificateWindow, "timeout");

        assert_eq!(
            report.warning(),
            PersistenceStep::MarkCompanyIntegrated.warning()
        );
        assert_eq!(report.failures().len(), 2);
    }

    #[test]
    fn error_cleanup_failure_is_silent() {
        let mut report = PersistenceReport::new();
        report.record_failure(PersistenceStep::DeleteIntegrationErrors, "boom");

        assert!(report.warning().is_none());
        assert_eq!(report.failures()[0].step, PersistenceStep::DeleteIntegrationErrors);
    }

    #[test]
    fn silent_failure_does_not_block_later_warning() {
        let mut report = PersistenceReport::new();
        report.record_failure(PersistenceStep::DeleteIntegrationErrors, "boom");
        report.record_failure(PersistenceStep::InsertIntegration, "boom");
        assert_eq!(report.warning(), PersistenceStep::InsertIntegration.warning());
    }

    #[test]
    fn missing_fact_report_carries_generic_warning() {
        let report = PersistenceReport::missing_fact();
        assert_eq!(report.into_warning().as_deref(), Some(MISSING_FACT_WARNING));
    }

    #[test]
    fn warnings_are_valid_header_values() {
        let all = PersistenceStep::PLAN
            .iter()
            .filter_map(|s| s.warning())
            .chain(std::iter::once(MISSING_FACT_WARNING));
        for w in all {
            assert!(w.bytes().all(|b| (0x20..0x7f).contains(&b)), "{}", w);
        }
    }
}
