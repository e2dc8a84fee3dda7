use std::io::{self, IsTerminal};

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use time::macros::format_description;

/// Log level for a run: debug under `--verbose`, info otherwise.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Where log lines go.
///
/// Normally info and below share stdout with the summary, while warnings
/// and errors go to stderr. When stdout carries a JSON report everything
/// goes to stderr so stdout stays parseable.
pub fn terminal_mode(json_output: bool) -> TerminalMode {
    if json_output {
        TerminalMode::Stderr
    } else {
        TerminalMode::Mixed
    }
}

/// Colour only when the log destination is a terminal.
pub fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Install the terminal logger. Timestamps carry milliseconds and use the
/// local offset when it can be determined.
pub fn init_logging(verbose: bool, json_output: bool) -> Result<(), log::SetLoggerError> {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_custom(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        ))
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off);
    // Falls back to UTC when the local offset cannot be determined.
    let _ = builder.set_time_offset_to_local();

    let is_terminal = if json_output {
        io::stderr().is_terminal()
    } else {
        io::stdout().is_terminal()
    };

    TermLogger::init(
        level_for(verbose),
        builder.build(),
        terminal_mode(json_output),
        color_choice(is_terminal),
    )
}
