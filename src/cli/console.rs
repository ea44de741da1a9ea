use colored::*;
use std::io::{self, Write};

/// Console handles all terminal output with colored formatting
pub struct Console {
    accent: Color,
}

impl Console {
    /// Create a new Console with the default accent color
    pub fn new() -> Self {
        Self {
            accent: Color::BrightBlue,
        }
    }

    /// Create a new Console with a custom accent color
    pub fn with_accent(accent: Color) -> Self {
        Self { accent }
    }

    /// Print a banner with a title
    pub fn print_banner(&self, title: &str) {
        println!("{}", "=".repeat(70).color(self.accent));
        println!("{}", format!("  {}", title).color(self.accent).bold());
        println!("{}", "=".repeat(70).color(self.accent));
    }

    /// Print a `label: value` line
    pub fn print_field(&self, label: &str, value: &str) {
        println!("{} {}", format!("{}:", label).bold(), value);
    }

    /// Print a progress prefix without a newline
    pub fn print_progress(&self, message: &str) {
        print!("{} ", message);
        let _ = io::stdout().flush();
    }

    /// Print a success marker and message
    pub fn print_success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a soft warning (endpoint exists but something is off)
    pub fn print_warning(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print a failure marker and message
    pub fn print_failure(&self, message: &str) {
        println!("{} {}", "✗".red().bold(), message);
    }

    /// Print an indented detail line
    pub fn print_detail(&self, message: &str) {
        println!("    {}", message.bright_black());
    }

    /// Print a system message (hints, advice)
    pub fn print_system(&self, message: &str) {
        println!("{} {}", "System:".yellow().bold(), message);
    }

    /// Print an error message
    pub fn print_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }

    /// Print a newline
    pub fn println(&self) {
        println!();
    }

    /// Print a separator line
    pub fn print_separator(&self) {
        println!("{}", "-".repeat(70).bright_black());
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
