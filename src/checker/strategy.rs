use crate::checker::remote::{HttpSpellService, SpellService};
use crate::checker::{validate_input, SpellChecker};
use crate::cli::output::Display;
use crate::clipboard::{self, Clipboard};
use crate::config::Strategy;
use crate::error::CheckError;
use crate::{CheckResult, Config};
use async_trait::async_trait;
use std::io;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Checked(CheckResult),
    /// The user was sent to an external checker instead
    Redirected {
        url: String,
        copied: bool,
        opened: bool,
    },
}

#[async_trait]
pub trait CheckStrategy: Send + Sync {
    async fn run(
        &self,
        text: &str,
        display: &dyn Display,
        cancel: &CancellationToken,
    ) -> Result<CheckOutcome, CheckError>;
}

pub struct ApiStrategy<S> {
    checker: SpellChecker<S>,
}

impl<S: SpellService> ApiStrategy<S> {
    pub fn new(checker: SpellChecker<S>) -> Self {
        Self { checker }
    }
}

#[async_trait]
impl<S: SpellService> CheckStrategy for ApiStrategy<S> {
    async fn run(
        &self,
        text: &str,
        display: &dyn Display,
        cancel: &CancellationToken,
    ) -> Result<CheckOutcome, CheckError> {
        let result = self.checker.check_spelling(text, display, cancel).await?;
        Ok(CheckOutcome::Checked(result))
    }
}

/// Opens a URL in the user's browser
pub trait Launcher: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, url: &str) -> io::Result<()> {
        open::that(url)
    }
}

/// Copies the text and sends the user to a spell-checker website
pub struct RedirectStrategy<C, L> {
    clipboard: C,
    launcher: L,
    url: String,
    max_input_length: usize,
}

impl<C: Clipboard, L: Launcher> RedirectStrategy<C, L> {
    pub fn new(clipboard: C, launcher: L, url: String, max_input_length: usize) -> Self {
        Self {
            clipboard,
            launcher,
            url,
            max_input_length,
        }
    }
}

#[async_trait]
impl<C: Clipboard, L: Launcher> CheckStrategy for RedirectStrategy<C, L> {
    async fn run(
        &self,
        text: &str,
        display: &dyn Display,
        _cancel: &CancellationToken,
    ) -> Result<CheckOutcome, CheckError> {
        let text = validate_input(text, self.max_input_length)?;

        // Pasting by hand still works when the copy fails
        let copied = match self.clipboard.copy(text) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not copy text for redirect");
                false
            }
        };

        let opened = match self.launcher.open(&self.url) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, url = %self.url, "could not open browser");
                false
            }
        };

        display.show_redirect(&self.url, copied, opened);

        Ok(CheckOutcome::Redirected {
            url: self.url.clone(),
            copied,
            opened,
        })
    }
}

/// Build the strategy selected in the configuration
pub fn from_config(config: &Config) -> Result<Box<dyn CheckStrategy>, CheckError> {
    match config.strategy {
        Strategy::Api => {
            let checker: SpellChecker<HttpSpellService> = SpellChecker::from_config(config)?;
            Ok(Box::new(ApiStrategy::new(checker)))
        }
        Strategy::Redirect => Ok(Box::new(RedirectStrategy::new(
            clipboard::default_clipboard(),
            SystemLauncher,
            config.redirect_url.clone(),
            config.max_input_length,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::remote::tests::{reply, ScriptedService};
    use crate::cli::output::tests::RecordingDisplay;
    use crate::error::{ClipboardError, ValidationError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Mutex<Option<String>>,
        deny: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn copy(&self, text: &str) -> Result<(), ClipboardError> {
            if self.deny {
                return Err(ClipboardError::Denied("not allowed".to_string()));
            }
            *self.contents.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLauncher {
        opened: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Launcher for RecordingLauncher {
        fn open(&self, url: &str) -> io::Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no browser"));
            }
            Ok(())
        }
    }

    fn redirect(deny: bool) -> RedirectStrategy<MemoryClipboard, RecordingLauncher> {
        redirect_with(deny, false)
    }

    fn redirect_with(
        deny: bool,
        fail_launch: bool,
    ) -> RedirectStrategy<MemoryClipboard, RecordingLauncher> {
        RedirectStrategy::new(
            MemoryClipboard {
                contents: Mutex::new(None),
                deny,
            },
            RecordingLauncher {
                opened: Mutex::new(Vec::new()),
                fail: fail_launch,
            },
            "http://speller.example/".to_string(),
            20,
        )
    }

    #[tokio::test]
    async fn test_redirect_copies_and_opens() {
        let strategy = redirect(false);
        let display = RecordingDisplay::default();
        let outcome = strategy
            .run("  고쳐 주세요  ", &display, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CheckOutcome::Redirected {
                url: "http://speller.example/".to_string(),
                copied: true,
                opened: true,
            }
        );
        assert_eq!(
            strategy.clipboard.contents.lock().unwrap().as_deref(),
            Some("고쳐 주세요")
        );
        assert_eq!(*strategy.launcher.opened.lock().unwrap(), vec!["http://speller.example/"]);
        assert_eq!(display.redirects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_redirect_survives_clipboard_denial() {
        let strategy = redirect(true);
        let display = RecordingDisplay::default();
        let outcome = strategy
            .run("text", &display, &CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(outcome, CheckOutcome::Redirected { copied: false, opened: true, .. }));
    }

    #[tokio::test]
    async fn test_redirect_survives_launcher_failure() {
        let strategy = redirect_with(false, true);
        let display = RecordingDisplay::default();
        let outcome = strategy
            .run("text", &display, &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(outcome, CheckOutcome::Redirected { copied: true, opened: false, .. }));
        assert_eq!(strategy.clipboard.contents.lock().unwrap().as_deref(), Some("text"));
        assert_eq!(display.redirects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_redirect_reports_total_failure() {
        let strategy = redirect_with(true, true);
        let display = RecordingDisplay::default();
        let outcome = strategy
            .run("text", &display, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CheckOutcome::Redirected {
                url: "http://speller.example/".to_string(),
                copied: false,
                opened: false,
            }
        );
        assert_eq!(strategy.launcher.opened.lock().unwrap().len(), 1);
        assert_eq!(display.redirects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_redirect_validates_input() {
        let strategy = redirect(false);
        let display = RecordingDisplay::default();

        let err = strategy
            .run("", &display, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::Validation(ValidationError::Empty)));

        let err = strategy
            .run(&"a".repeat(21), &display, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::Validation(ValidationError::TooLong { .. })));
        assert!(strategy.launcher.opened.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_api_strategy_returns_checked() {
        let service = ScriptedService::new(vec![reply(&[("됬다", "됐다")], "됐다")]);
        let strategy = ApiStrategy::new(SpellChecker::new(service, &Config::default()));
        let display = RecordingDisplay::default();

        let outcome = strategy
            .run("됬다", &display, &CancellationToken::new())
            .await
            .unwrap();

        match outcome {
            CheckOutcome::Checked(result) => {
                assert_eq!(result.total_error_count, 1);
                assert_eq!(result.errors[0].chunk_index, 1);
                assert_eq!(result.corrected_text, "됐다");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_from_config_selects_strategy() {
        let config = Config {
            strategy: Strategy::Redirect,
            ..Default::default()
        };
        assert!(from_config(&config).is_ok());
        assert!(from_config(&Config::default()).is_ok());
    }
}
