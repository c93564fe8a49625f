// Integration tests share the crate's own fixture builders
#[allow(dead_code)]
#[path = "../../src/test_helpers.rs"]
pub mod fixtures;
pub mod synthetic_image;

/// Route `log` output through the test harness; `RUST_LOG=debug` shows it.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
