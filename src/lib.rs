/// cc-array-extract library crate.
///
/// Exposes the extraction pipeline as a public API so that
/// integration tests in tests/ can import them via `cc_array_extract::`.
///
/// The binary entry point (src/main.rs) uses these same modules.
pub mod converter;
pub mod extractor;
pub mod input;
pub mod manifest;
pub mod pack;
pub mod utils;
