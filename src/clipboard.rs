use crate::error::ClipboardError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{self, ErrorKind, IsTerminal, Write};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use tracing::{debug, warn};

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Pipes text into the first clipboard program that accepts it
pub struct CommandClipboard {
    candidates: Vec<(&'static str, Vec<&'static str>)>,
}

impl CommandClipboard {
    pub fn new(candidates: Vec<(&'static str, Vec<&'static str>)>) -> Self {
        Self { candidates }
    }

    /// The regular copy/paste clipboard
    pub fn system() -> Self {
        Self::new(vec![
            ("pbcopy", vec![]),
            ("wl-copy", vec![]),
            ("xclip", vec!["-selection", "clipboard"]),
            ("xsel", vec!["--clipboard", "--input"]),
            ("clip", vec![]),
        ])
    }

    fn run(&self, program: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // stdin is dropped at the end of the match so the child sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        let status = child.wait()?;
        match written {
            // The exit status tells whether the copy happened
            Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
            _ => {}
        }

        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Denied(format!("{} exited with {}", program, status)))
        }
    }
}

impl Clipboard for CommandClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut last_error = None;

        for (program, args) in &self.candidates {
            match self.run(program, args, text) {
                Ok(()) => {
                    debug!(program, chars = text.chars().count(), "copied to clipboard");
                    return Ok(());
                }
                Err(ClipboardError::Io(e)) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    debug!(program, error = %e, "clipboard program failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ClipboardError::Unsupported))
    }
}

/// Copies through the terminal with an OSC 52 escape sequence
pub struct Osc52Clipboard<W> {
    writer: Mutex<W>,
    interactive: bool,
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            interactive: true,
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Osc52Clipboard<io::Stderr> {
    /// Writes to stderr; refuses when stderr isn't a terminal
    pub fn stderr() -> Self {
        let stderr = io::stderr();
        Self {
            interactive: stderr.is_terminal(),
            writer: Mutex::new(stderr),
        }
    }
}

pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        if !self.interactive {
            return Err(ClipboardError::Unsupported);
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| ClipboardError::Denied("terminal writer poisoned".to_string()))?;
        writer.write_all(osc52_sequence(text).as_bytes())?;
        writer.flush()?;

        debug!(chars = text.chars().count(), "copied via terminal escape");
        Ok(())
    }
}

/// Tries `primary`, then `fallback`; the fallback's error is the one surfaced
pub struct FallbackClipboard<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Clipboard, F: Clipboard> FallbackClipboard<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: Clipboard, F: Clipboard> Clipboard for FallbackClipboard<P, F> {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        match self.primary.copy(text) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "clipboard copy failed, trying terminal escape");
                self.fallback.copy(text)
            }
        }
    }
}

/// Clipboard used by the binary: system clipboard with OSC 52 fallback
pub fn default_clipboard() -> FallbackClipboard<CommandClipboard, Osc52Clipboard<io::Stderr>> {
    FallbackClipboard::new(CommandClipboard::system(), Osc52Clipboard::stderr())
}
