use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;
use crate::terminal::report::ReportLine;

pub const TOTAL_WIDTH: usize = 80;

/// Tracing target of terminal output. The formatter prints these verbatim.
pub const TARGET: &str = "netrun::print";
pub const RAW_FIELD: &str = "raw_msg";

#[macro_export]
macro_rules! nprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: TARGET, raw_msg = msg);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = UnicodeWidthStr::width(formatted.as_str());

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn rule() {
    let sep: ColoredString = "~".repeat(TOTAL_WIDTH).color(colors::SEPARATOR);
    print(&format!("{}", sep));
}

/// Pads `msg` on both sides to `width` columns. ANSI codes do not count.
pub fn center(msg: &str, width: usize) -> String {
    let pad: usize = width.saturating_sub(console::measure_text_width(msg));
    let left: usize = pad / 2;
    format!("{}{}{}", " ".repeat(left), msg, " ".repeat(pad - left))
}

pub fn centerln(msg: &str) {
    print(center(msg, TOTAL_WIDTH).trim_end());
}

/// Centered text with an empty line before and after.
pub fn banner(msg: &str) {
    print("");
    centerln(msg);
    print("");
}

pub fn as_tree_one_level(key_value_pair: &[(String, ColoredString)]) {
    let key_width: usize = key_value_pair.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    for (i, (key, value)) in key_value_pair.iter().enumerate() {
        let last: bool = i + 1 == key_value_pair.len();
        let branch: ColoredString = if !last {
            "├─".bright_black()
        } else {
            "└─".bright_black()
        };
        let output: String = format!(
            "    {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            ".".repeat(key_width + 1 - key.len()).color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        );
        print(&output);
    }
}

pub fn render(lines: &[ReportLine]) {
    let mut details: Vec<(String, ColoredString)> = Vec::new();

    for line in lines {
        if !matches!(line, ReportLine::Detail { .. }) && !details.is_empty() {
            as_tree_one_level(&details);
            details.clear();
        }

        match line {
            ReportLine::Rule => rule(),
            ReportLine::Banner(text) => banner(&format!("{}", text.color(colors::PRIMARY))),
            ReportLine::Success(text) => banner(&format!("{}", text.color(colors::SUCCESS).bold())),
            ReportLine::Failure(text) => banner(&format!("{}", text.color(colors::FAILURE).bold())),
            ReportLine::Detail { key, value } => {
                details.push((key.clone(), value.color(colors::ACCENT)));
            }
        }
    }

    if !details.is_empty() {
        as_tree_one_level(&details);
    }
}
