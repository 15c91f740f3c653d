//! Service layer for honor records.
//! - Use cases live in `honor::service` and return typed results.
//! - Persistence sits behind `honor::repository::HonorRepository` with an explicit unit of work.
//! - Spreadsheet import/export is isolated in `spreadsheet`.

pub mod errors;
pub mod pagination;
pub mod observability;
pub mod honor;
pub mod spreadsheet;
#[cfg(test)]
pub mod test_support;
