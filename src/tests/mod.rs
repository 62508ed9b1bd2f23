//! Crate-level integration tests; unit tests live next to each module.

mod integration;
