//! Handler discovery and invocation integration tests.

mod discovery;
mod invalid_shapes;
mod units;
