//! Command output
//!
//! Commands write their output through a boxed `Write` owned by the repository.
//! Long listings (`log`, `global-log`) go through the `minus` pager when stdout
//! is an interactive terminal; everything else goes straight to stdout.

use derive_new::new;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::{self, Write};

/// Environment variable that disables paging when set
pub const NO_PAGER_ENV: &str = "NO_PAGER";

/// Wrapper that implements `Write` for the minus pager
///
/// Bytes are buffered until a full UTF-8 sequence is available, so multi-byte
/// characters split across writes reach the pager intact.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
    #[new(default)]
    pending: Vec<u8>,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);

        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(error) if error.error_len().is_none() => error.valid_up_to(),
            Err(error) => return Err(io::Error::new(io::ErrorKind::InvalidData, error)),
        };

        let text = String::from_utf8_lossy(&self.pending[..valid_up_to]).to_string();
        self.pager.push_str(text).map_err(io::Error::other)?;
        self.pending.drain(..valid_up_to);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where a command's output goes
pub enum Output {
    Stdout,
    Paged(Pager),
}

impl Output {
    /// Pick the pager only for an interactive stdout without `NO_PAGER`
    pub fn for_listing() -> Self {
        if io::stdout().is_terminal() && std::env::var_os(NO_PAGER_ENV).is_none() {
            Output::Paged(Pager::new())
        } else {
            Output::Stdout
        }
    }

    pub fn writer(&self) -> Box<dyn Write> {
        match self {
            Output::Stdout => Box::new(io::stdout()),
            Output::Paged(pager) => Box::new(PagerWriter::new(pager.clone())),
        }
    }

    /// Hand the collected output to the pager, if any
    pub fn finish(self) -> anyhow::Result<()> {
        match self {
            Output::Stdout => Ok(io::stdout().flush()?),
            Output::Paged(pager) => Ok(minus::page_all(pager)?),
        }
    }
}
