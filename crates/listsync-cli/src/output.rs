use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

/// User-facing messages on stdout; diagnostics go through `tracing` instead
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message("success", || format!("{} {}", "✓".green(), msg.as_ref()), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.message("info", || msg.as_ref().to_string(), msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message("warning", || format!("{} {}", "⚠".yellow(), msg.as_ref()), msg.as_ref());
    }

    /// Human output is printed verbatim; machine formats wrap it in a typed message
    fn message(&self, kind: &str, human: impl FnOnce() -> String, plain: &str) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", human()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": kind,
                    "message": plain
                }));
            }
        }
    }

    /// Print a block of preformatted human output (tables)
    pub fn block(&self, text: impl std::fmt::Display) {
        if !self.quiet && self.is_human() {
            println!("{}", text);
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet {
            return;
        }
        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Json | OutputFormat::Human => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
        }
    }
}
