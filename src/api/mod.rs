pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod progress;
pub(crate) mod router;
pub(crate) mod students;
pub(crate) mod tutor;
pub(crate) mod validation;
