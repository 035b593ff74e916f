/// Installs the global logger. Everything at `Info` and above is printed to stdout,
/// and debug builds also show this crate's and the core crate's `Debug` messages.
pub fn init() -> Result<(), log::SetLoggerError> {
    let own_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .level_for("cgdemo_client", own_level)
        .level_for("cgdemo_core", own_level)
        .chain(std::io::stdout())
        .apply()
}
