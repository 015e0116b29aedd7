use crate::error::CheckError;
use crate::{CheckResult, TextStatistics};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

/// Other spell checkers offered when the remote check fails
pub const ALTERNATIVES: [(&str, &str); 2] = [
    ("부산대 맞춤법 검사기", "http://speller.cs.pusan.ac.kr/"),
    (
        "국립국어원 한국어 어문 규정",
        "https://kornorms.korean.go.kr/regltn/regltnView.do?regltn_code=0003#a",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Presentation surface for statistics and spell-check progress/results
pub trait Display: Send + Sync {
    fn show_statistics(&self, stats: &TextStatistics);
    fn show_progress(&self, current: usize, total: usize);
    fn show_result(&self, result: &CheckResult);
    fn show_redirect(&self, url: &str, copied: bool, opened: bool);
    fn show_copied(&self, chars: usize);
    fn show_failure(&self, error: &CheckError);
}

pub fn display_for(format: OutputFormat, colored: bool) -> Box<dyn Display> {
    match format {
        OutputFormat::Text => Box::new(TerminalDisplay::new(colored)),
        OutputFormat::Json => Box::new(JsonDisplay),
    }
}

/// Format a count with thousands separators
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub struct TerminalDisplay {
    colored: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalDisplay {
    pub fn new(colored: bool) -> Self {
        Self {
            colored,
            spinner: Mutex::new(None),
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn print_alternatives(&self) {
        if self.colored {
            println!("{}", "Try one of these instead:".cyan());
        } else {
            println!("Try one of these instead:");
        }
        for (name, url) in ALTERNATIVES {
            if self.colored {
                println!("  • {} {}", name.bold(), url.dimmed());
            } else {
                println!("  • {} {}", name, url);
            }
        }
    }
}

impl Display for TerminalDisplay {
    fn show_statistics(&self, stats: &TextStatistics) {
        let rows = [
            ("Characters", stats.total_chars),
            ("Characters (no spaces)", stats.non_space_chars),
            ("Words", stats.word_count),
            ("Sentences", stats.sentence_count),
            ("Lines", stats.line_count),
        ];

        for (label, value) in rows {
            let value = format_count(value);
            if self.colored {
                println!("{:<24} {}", label.bold(), value.cyan());
            } else {
                println!("{:<24} {}", label, value);
            }
        }
    }

    fn show_progress(&self, current: usize, total: usize) {
        let Ok(mut spinner) = self.spinner.lock() else {
            return;
        };
        let pb = spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_message(format!("Checking spelling... ({}/{})", current, total));
    }

    fn show_result(&self, result: &CheckResult) {
        self.clear_spinner();

        if result.total_error_count == 0 {
            if self.colored {
                println!("{}", "✓ No spelling errors found!".green().bold());
            } else {
                println!("✓ No spelling errors found!");
            }
            return;
        }

        let error_word = if result.total_error_count == 1 { "error" } else { "errors" };
        if self.colored {
            println!(
                "{} {} {} found:",
                "✗".red().bold(),
                format_count(result.total_error_count).red().bold(),
                error_word
            );
        } else {
            println!(
                "✗ {} {} found:",
                format_count(result.total_error_count),
                error_word
            );
        }

        for (i, error) in result.errors.iter().enumerate() {
            let number = format!("{:>3}.", i + 1);
            if self.colored {
                println!(
                    "{} {} {} {}",
                    number.blue().bold(),
                    error.original_text.red().bold(),
                    "→".dimmed(),
                    error.candidate_text.green()
                );
            } else {
                println!(
                    "{} {} → {}",
                    number, error.original_text, error.candidate_text
                );
            }
            if let Some(help) = &error.help_text {
                if self.colored {
                    println!("     {}", help.dimmed());
                } else {
                    println!("     {}", help);
                }
            }
        }

        println!();
        if self.colored {
            println!("{}", "Corrected text:".bold());
        } else {
            println!("Corrected text:");
        }
        println!("{}", result.corrected_text);
    }

    fn show_redirect(&self, url: &str, copied: bool, opened: bool) {
        self.clear_spinner();

        if copied {
            println!("Text copied to the clipboard.");
        } else {
            println!("Could not copy the text; copy it manually.");
        }
        let action = if opened { "Opened" } else { "Open" };
        if self.colored {
            println!("{} {} and paste the text there.", action, url.cyan().underline());
        } else {
            println!("{} {} and paste the text there.", action, url);
        }
    }

    fn show_copied(&self, chars: usize) {
        if self.colored {
            println!(
                "{} Copied {} characters",
                "✓".green().bold(),
                format_count(chars)
            );
        } else {
            println!("✓ Copied {} characters", format_count(chars));
        }
    }

    fn show_failure(&self, error: &CheckError) {
        self.clear_spinner();

        let message = match error {
            CheckError::Validation(e) => format!("Cannot check spelling: {}", e),
            CheckError::Clipboard(e) => format!("Copy failed: {}", e),
            CheckError::Cancelled => "Spell check cancelled.".to_string(),
            other => format!("Spell check failed: {}", other),
        };

        if self.colored {
            eprintln!("{}", message.red().bold());
        } else {
            eprintln!("{}", message);
        }

        if error.offers_alternatives() {
            self.print_alternatives();
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonAlternative {
    name: &'static str,
    url: &'static str,
}

#[derive(Debug, Serialize)]
struct JsonFailure {
    error: String,
    alternatives: Vec<JsonAlternative>,
}

#[derive(Debug, Serialize)]
struct JsonRedirect<'a> {
    redirect: &'a str,
    copied: bool,
    opened: bool,
}

#[derive(Debug, Serialize)]
struct JsonCopied {
    copied: usize,
}

/// Machine-readable output: one JSON document per final event
pub struct JsonDisplay;

impl JsonDisplay {
    fn emit<T: Serialize>(value: &T) {
        println!("{}", serde_json::to_string_pretty(value).unwrap());
    }
}

impl Display for JsonDisplay {
    fn show_statistics(&self, stats: &TextStatistics) {
        Self::emit(stats);
    }

    fn show_progress(&self, current: usize, total: usize) {
        tracing::debug!(current, total, "progress");
    }

    fn show_result(&self, result: &CheckResult) {
        Self::emit(result);
    }

    fn show_redirect(&self, url: &str, copied: bool, opened: bool) {
        Self::emit(&JsonRedirect {
            redirect: url,
            copied,
            opened,
        });
    }

    fn show_copied(&self, chars: usize) {
        Self::emit(&JsonCopied { copied: chars });
    }

    fn show_failure(&self, error: &CheckError) {
        let alternatives = if error.offers_alternatives() {
            ALTERNATIVES
                .iter()
                .map(|&(name, url)| JsonAlternative { name, url })
                .collect()
        } else {
            Vec::new()
        };
        Self::emit(&JsonFailure {
            error: error.to_string(),
            alternatives,
        });
    }
}
