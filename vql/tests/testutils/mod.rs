//! Shared helpers for VQL integration tests

#![allow(dead_code)]

pub mod parse_fixture;

/// Route `log` output through the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
