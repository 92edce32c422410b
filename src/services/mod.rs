pub(crate) mod progress_analysis;
pub(crate) mod remediation;
pub(crate) mod tutor;
