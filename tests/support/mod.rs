//! Shared helpers for tests that rewrite the process environment.

use std::env;
use std::sync::Mutex;

// The EE_* configuration variables are process-global; tests that rewrite
// them must not interleave.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with environment variables scoped to the call.
///
/// Each `(key, value)` pair sets the variable (`Some`) or unsets it (`None`);
/// the previous values come back afterward, on panic too.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _serial = ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let _restore = RestoreEnv(
        changes
            .iter()
            .map(|(key, _)| ((*key).to_string(), env::var(key).ok()))
            .collect(),
    );
    for (key, value) in changes {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }

    f()
}

struct RestoreEnv(Vec<(String, Option<String>)>);

impl Drop for RestoreEnv {
    fn drop(&mut self) {
        for (key, previous) in self.0.drain(..) {
            match previous {
                Some(value) => env::set_var(&key, value),
                None => env::remove_var(&key),
            }
        }
    }
}
