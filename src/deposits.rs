//! Manual deposit review workflow: record model, marketplace API
//! adapters, the review state machine, and the console handlers.

pub(crate) mod api;
pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod review;
pub(crate) mod summary;
pub(crate) mod types;
