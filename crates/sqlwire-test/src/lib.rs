//! # sqlwire-test
//!
//! Integration tests for sqlwire: full client/server round trips over real
//! TCP sockets. The test modules live under `tests/`.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::sync::atomic::{AtomicU16, Ordering};

/// Port counter for test isolation.
static PORT_COUNTER: AtomicU16 = AtomicU16::new(59300);

/// Returns a unique localhost port so concurrently running tests do not
/// collide on bind.
pub fn next_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}
