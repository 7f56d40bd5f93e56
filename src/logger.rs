// Copyright 2023-2024 the docver developers
// Licensed under the MIT License.

//! A very simple logger.
//!
//! Informational messages go to standard output with a colored `info:`
//! prefix; everything else goes to standard error. Filtering relies on
//! `log::set_max_level()`.

use lazy_static::lazy_static;
use log::{Level, Log};
use std::{
    io::{self, Write},
    sync::RwLock,
};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

pub struct Logger {
    inner: RwLock<InnerLogger>,
}

struct InnerLogger {
    stdout: StandardStream,
    stderr: StandardStream,
}

lazy_static! {
    static ref LOGGER: Logger = Logger {
        inner: RwLock::new(InnerLogger {
            stdout: StandardStream::stdout(ColorChoice::Auto),
            stderr: StandardStream::stderr(ColorChoice::Auto),
        }),
    };
}

fn severity_spec(level: Level) -> ColorSpec {
    let mut spec = ColorSpec::new();

    match level {
        Level::Info => spec.set_fg(Some(Color::Green)).set_bold(true),
        Level::Warn => spec.set_fg(Some(Color::Yellow)).set_bold(true),
        Level::Error => spec.set_fg(Some(Color::Red)).set_bold(true),
        Level::Trace | Level::Debug => &mut spec,
    };

    spec
}

fn severity_prefix(level: Level) -> &'static str {
    match level {
        Level::Trace => "trace:",
        Level::Debug => "debug:",
        Level::Info => "info:",
        Level::Warn => "warning:",
        Level::Error => "error:",
    }
}

fn emit(stream: &mut StandardStream, spec: &ColorSpec, prefix: &str, text: &str) {
    let _r = stream.set_color(spec);
    let _r = write!(stream, "{}", prefix);
    let _r = stream.reset();
    let _r = writeln!(stream, " {}", text);
}

impl Logger {
    /// Set up this type as the global static logger.
    pub fn init() -> Result<(), log::SetLoggerError> {
        log::set_logger(&*LOGGER)
    }

    /// Print one entry in an error's cause chain, below the main report.
    pub fn print_cause(cause: &dyn std::error::Error) {
        if let Ok(mut inner) = LOGGER.inner.write() {
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(Color::Cyan)).set_bold(true);
            emit(&mut inner.stderr, &spec, "  caused by:", &cause.to_string());
        }
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if let Ok(mut inner) = self.inner.write() {
            let level = record.level();
            let spec = severity_spec(level);
            let prefix = severity_prefix(level);
            let text = record.args().to_string();

            if level == Level::Info {
                emit(&mut inner.stdout, &spec, prefix, &text);
            } else {
                emit(&mut inner.stderr, &spec, prefix, &text);
            }
        }
    }

    fn flush(&self) {
        let _r = io::stdout().flush();
    }
}
