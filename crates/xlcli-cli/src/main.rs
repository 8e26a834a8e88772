//! excel-cli - read and modify Excel workbooks from the command line

mod commands;
mod output;

use std::io::{self, Write};
use std::process::ExitCode;

use log::{debug, LevelFilter};
use xlcli::SpreadsheetService;

fn main() -> ExitCode {
    let matches = match commands::build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            // --help and --version land here too and are not failures
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = err.print();
            return code;
        }
    };

    init_logging(matches.get_count("verbose"));

    let service = SpreadsheetService::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = commands::run(&matches, &service, &mut out)
        .and_then(|()| out.flush().map_err(anyhow::Error::from));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("{:?}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr at warn, info (`--verbose`) or debug (`--verbose --verbose`);
/// `RUST_LOG` takes precedence
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
