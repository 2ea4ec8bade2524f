pub mod audit;
pub mod report;

use colored::Colorize;

/// Printed when a descendant reference cites the audited page.
pub const CIRCULAR_MESSAGE: &str =
    "Circular citation was detected back to original url - untrustworthy!";

pub fn print_banner() {
    println!(
        "{} {}",
        "citeloop".bright_cyan().bold(),
        format!("v{} - circular citation detector", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
