//! Shared test utilities for xfer-db tests.
