/// Initializes structured logging for the process.
///
/// Filtering is environment-based: set `RUST_LOG` to control verbosity,
/// e.g. `RUST_LOG=mapper_framework=debug` to watch pack/unpack dispatch or
/// `RUST_LOG=info` for the startup wiring only. Invariant violations are
/// emitted on the `mapper_framework::invariant` target before the process
/// aborts, so they can be filtered distinctly from ordinary errors.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
