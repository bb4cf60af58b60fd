// Library root
// -----------
// This crate exposes a small library surface for the movie CLI. The binary
// (`main.rs`) uses these modules to implement the interactive application.
//
// Module responsibilities:
// - `api`: Blocking HTTP client for the OMDb catalog and response mapping.
// - `storage`: SQLite persistence with structured CRUD outcomes.
// - `stats`: Pure statistics, search and sort functions over the snapshot.
// - `html`: Static landing-page generation from the shipped template.
// - `ui`: Terminal menu loop that wires user choices to the layers above.
//
// Keeping this separation makes the storage and stats logic testable
// without a terminal or network connection.
pub mod api;
pub mod html;
pub mod stats;
pub mod storage;
pub mod ui;
