use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("linear_buckets", LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        // Tests may race another initializer.
        let _ = builder.try_init();
    });
}
