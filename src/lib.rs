//! Public library API for decoding and validating MS-ONESTORE revision store files.

/// Revision store decoding, containment graph building, and structural validation.
pub mod store;
