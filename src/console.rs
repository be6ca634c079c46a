use std::io::{self, BufRead, Write};
use std::process::Command;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;

use crate::game::{Console, FAREWELL};

/// `Console` on the process's stdin and stdout.
pub(crate) struct Terminal {
    delay: Duration,
}

impl Terminal {
    pub(crate) fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

/// Prints the farewell and ends the process when the user hits Ctrl-C.
pub(crate) fn exit_on_interrupt() -> Result<()> {
    ctrlc::set_handler(|| {
        let _ = say_goodbye(&mut io::stdout().lock());
        std::process::exit(0);
    })
    .context("failed to install the Ctrl-C handler")
}

fn say_goodbye<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", FAREWELL)?;
    out.flush()
}

/// Reads one line, replacing bytes that are not UTF-8. `None` at end of input.
fn read_line_lossy<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut bytes = Vec::new();
    if reader.read_until(b'\n', &mut bytes)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

impl Console for Terminal {
    fn clear(&mut self) -> Result<()> {
        let program = if cfg!(windows) { "cls" } else { "clear" };
        let status = if cfg!(windows) {
            Command::new("cmd").args(["/C", program]).status()
        } else {
            Command::new(program).status()
        };
        if let Err(err) = status {
            warn!("could not run {}: {}", program, err);
        }
        Ok(())
    }

    fn show(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text).context("failed to write to stdout")
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        {
            // Not held across the stdin read: the interrupt handler writes
            // to stdout.
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}", message).context("failed to write to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }

        let line = read_line_lossy(&mut io::stdin().lock()).context("failed to read from stdin")?;
        if line.is_none() {
            // Leave the cursor on a fresh line before the farewell.
            writeln!(io::stdout()).context("failed to write to stdout")?;
        }
        Ok(line)
    }

    fn pause(&mut self) {
        thread::sleep(self.delay);
    }
}
