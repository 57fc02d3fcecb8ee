use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use crate::config::General;
use crate::errors::LoggingError;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l:<5} {M} - {m}{n}";

/// Sets up log4rs with a file appender and, if configured, an appender on stderr.
/// Stdout is left to the forecast output.
///
/// # Arguments
///
/// * 'general' - general section of the configuration
pub fn setup_logger(general: &General) -> Result<Handle, LoggingError> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(&general.log_path)?;

    let mut builder = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)));
    let mut root = Root::builder().appender("file");

    if general.log_to_stdout {
        let console = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .target(Target::Stderr)
            .build();
        builder = builder.appender(Appender::builder().build("console", Box::new(console)));
        root = root.appender("console");
    }

    let config = builder
        .build(root.build(general.log_level))
        .map_err(|e| LoggingError(e.to_string()))?;

    Ok(log4rs::init_config(config)?)
}
