pub mod libs;

pub use libs::error::Error;

/// Initializes `env_logger` for one subcommand run.
///
/// `--debug` wins over `--verbose`. Without either, `RUST_LOG` decides, falling back to
/// warnings and errors only.
pub fn init_logger(verbose: bool, debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }

    // A second init (e.g. in-process tests) is not an error worth reporting
    let _ = builder
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
