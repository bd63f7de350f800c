use anyhow::{Context, Error as AnyError};
use chrono::Local;
use env_logger::{Env, Target, WriteStyle};
use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};

/// Sends log records to stderr and to `path`, formatted as
/// `[HH:MM:SS (LEVEL)]  message`.
///
/// The level filter comes from `RUST_LOG` and defaults to `debug`.
pub fn init(path: &Path) -> Result<(), AnyError> {
    let file = File::create(path).with_context(|| format!("creating log file {path:?}"))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} ({})]  {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(Tee(io::stderr(), file))))
        .try_init()?;
    Ok(())
}

/// Writes everything to both `A` and `B`.
struct Tee<A, B>(A, B);

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_all(buf)?;
        self.1.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()?;
        self.1.flush()
    }
}
