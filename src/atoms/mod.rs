// ── CarePlus Atoms Layer ───────────────────────────────────────────────────
// Pure constants, data types, and error types — zero side effects, no I/O.
// Dependency rule: atoms may only depend on std and external pure crates.
// Nothing here may import from engine/ or lib.rs.

pub mod constants;
pub mod error;
pub mod types;
