/*!

Types/type aliases that abstract over the implementing backing type.

# Background and Motivation

A motivating example is the `IString` type, an interned string type. A number of external crates could provide this
functionality. This module redirects to whatever chosen implementation we want. To use the
[`string_cache` crate](https://crates.io/crates/string_cache), we just define `IString` as an alias for
`string_cache::DefaultAtom`:

```ignore
pub use string_cache::DefaultAtom as IString;
```

The same philosophy applies to [`cache::MemoCache`]: callers never see that it is backed by the
[`lru` crate](https://crates.io/crates/lru) rather than some hand-rolled eviction scheme.

*/

pub mod cache;

// region Hashing data structures
pub use std::collections::{HashMap, HashSet};
// endregion

// Logging
pub use tracing;

/// Installs a process-wide `tracing` subscriber that writes to the test harness's captured
/// output, filtered by `RUST_LOG` (defaulting to `warn`). Safe to call from more than one test in
/// the same binary: later calls are no-ops once a subscriber is already installed.
pub fn init_test_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
    .with_test_writer()
    .try_init();
}

// Interned string. Use `DefaultAtom` for a global cache that can be used across threads.
pub use string_cache::DefaultAtom as IString;
