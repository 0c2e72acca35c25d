use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the logging backend. Safe to call more than once.
pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .filter_module("nontonanime_lib", log::LevelFilter::Debug)
            .filter_module("reqwest", log::LevelFilter::Warn)
            .filter_module("hyper", log::LevelFilter::Warn)
            .filter_module("tokio", log::LevelFilter::Warn)
            .format_timestamp_secs()
            .format_module_path(false)
            .init();

        log::info!("Logging system initialized");
    });
}
