use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};

const CONFIG_FILE: &str = "log4rs.yaml";
const FALLBACK_APPENDER: &str = "stderr";

#[ctor::ctor]
fn init() {
    if log4rs::init_file(CONFIG_FILE, Default::default()).is_ok() {
        return;
    }
    if let Err(e) = install_fallback() {
        eprintln!("Unable to install fallback logger: {}", e);
    }
}

fn install_fallback() -> Result<(), String> {
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = Config::builder()
        .appender(Appender::builder().build(FALLBACK_APPENDER, Box::new(stderr)))
        .build(
            Root::builder()
                .appender(FALLBACK_APPENDER)
                .build(LevelFilter::Warn),
        )
        .map_err(|e| e.to_string())?;
    log4rs::init_config(config)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

pub fn log_bytes(label: &str, bytes: &[u8]) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    fn get_byte_array(bytes: &[u8]) -> Vec<String> {
        bytes.iter().map(|byte| format!("{:02X}", byte)).collect()
    }
    log::trace!("{} ({} bytes)\n{:?}", label, bytes.len(), get_byte_array(bytes));
}
