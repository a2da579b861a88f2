//! Interactive prompts for settings not given on the command line.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use lctrace::extractor::FlowRate;
use lctrace::locator::BlockKind;

/// Line-oriented question/answer session over any reader and writer
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one answer; `None` at end of input
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(answer))
    }

    /// Ask until the answer names an existing directory
    pub fn directory(&mut self) -> Result<PathBuf> {
        let mut question = "\nPlease enter directory name:\n";
        loop {
            let Some(answer) = self.ask(question)? else {
                bail!("No directory given");
            };
            let dir = clean_path(&answer);
            if !dir.as_os_str().is_empty() && dir.is_dir() {
                return Ok(dir);
            }
            question = "Input not a directory. Try again: ";
        }
    }

    /// Ask for the flow rate; empty or invalid answers fall back to 1.0 ml/min
    pub fn flow_rate(&mut self) -> Result<FlowRate> {
        let answer = self.ask(
            "\nPlease enter the flow rate as ml/min (defaults to 1.0 if left empty):\n",
        )?;

        let parsed = answer
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().ok().and_then(|v| FlowRate::new(v).ok()));

        match parsed {
            Some(Some(flow_rate)) => Ok(flow_rate),
            Some(None) => {
                writeln!(self.output, "Not a valid flow rate, using 1.0 ml/min.")?;
                Ok(FlowRate::default())
            }
            None => Ok(FlowRate::default()),
        }
    }

    /// Ask for the trace; empty answers select fluorescence
    pub fn trace(&mut self) -> Result<BlockKind> {
        let mut question =
            "\nWhich traces do you want? UV ('uv') or fluorescence ('fl')?\n(Defaults to 'fl' if left empty)\n";
        loop {
            let answer = self.ask(question)?.unwrap_or_default();
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(BlockKind::Fluorescence);
            }
            match answer.parse::<BlockKind>() {
                Ok(kind) => return Ok(kind),
                Err(_) => question = "Please answer 'uv' or 'fl': ",
            }
        }
    }

    /// Print a line of user-facing output
    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

/// Tidy a pasted or drag-and-dropped path.
///
/// Surrounding quotes and trailing whitespace are removed. Outside Windows,
/// backslashes are shell escapes (`My\ Runs`) and are dropped.
fn clean_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim_end();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(trimmed);

    if cfg!(windows) {
        Path::new(unquoted).to_path_buf()
    } else {
        PathBuf::from(unquoted.replace('\\', ""))
    }
}
