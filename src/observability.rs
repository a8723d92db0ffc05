//! This module provides observability and diagnostics for table construction.
//!
//! Two tools live here:
//!
//! * `log_metric!`, a structured key-value line on stdout, compiled out of release
//!   builds entirely by `#[cfg(debug_assertions)]`;
//! * `enable_verbose_logging`, which installs an `env_logger` backend for the
//!   `log` facade the rest of the crate writes to.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use crate::error::LightTableError;

/// Logs a structured key-value metric string to stdout, only in debug builds.
///
/// # Example
/// ```
/// use lighttable::log_metric;
/// let rows = 4;
/// log_metric!("event"="import_column", "column"="qty", "rows"=&rows);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            let output = format!("LIGHTTABLE_METRIC: {{ {} }}", parts.join(", "));
            println!("{}", output);
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs a level-and-message `env_logger` backend at `Info` level.
///
/// With `log_file`, records are appended to that file instead of stderr. Only the
/// first call installs a logger; later calls are no-ops.
///
/// # Errors
/// `Io` if the log file cannot be opened for appending.
pub fn enable_verbose_logging(log_file: Option<&Path>) -> Result<(), LightTableError> {
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });

    Ok(())
}
