//! Scenario tests spanning the three trees


/// Installs a logger so `RUST_LOG=trace cargo test` shows the tree internals.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
