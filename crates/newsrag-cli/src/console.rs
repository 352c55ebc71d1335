//! Terminal presentation: notices and JSON output

use newsrag_core::{Notice, NoticeLevel, Notifier};
use serde::Serialize;

/// Prints notices to stderr so stdout stays machine-readable
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        eprintln!("{}", render(notice));
    }
}

fn render(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Error => "error",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Info => "info",
    };
    format!("[{}] {}", tag, notice.message)
}

/// Pretty-print `value` as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(render(&Notice::error("Network error")), "[error] Network error");
        assert_eq!(render(&Notice::info("Logged out")), "[info] Logged out");
    }
}
