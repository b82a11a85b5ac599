use anyhow::Result;
use chrono::{Datelike, Local};

use crate::{config::CosmeticConfig, page::Host, style};

pub const CURSOR_CLASS: &str = "typing-cursor";

pub fn this_year() -> i32 {
    Local::now().year()
}

// footer copyright year; returns false if the page has no placeholder for it
pub fn inject_year<H: Host>(host: &H, config: &CosmeticConfig, year: i32) -> bool {
    match host.by_id(&config.year_id) {
        Some(placeholder) => {
            host.set_text(&placeholder, &year.to_string());
            true
        }
        None => false,
    }
}

// purely decorative blinking bar after the hero code sample
pub fn append_cursor<H: Host>(host: &H, config: &CosmeticConfig) -> Result<Option<H::Node>> {
    let Some(code) = host.query(&config.code_selector) else {
        return Ok(None);
    };

    let cursor = host.create("span", CURSOR_CLASS)?;
    host.set_text(&cursor, "|");
    host.apply_style(&cursor, &style::cursor());
    host.install_stylesheet(style::CURSOR_SHEET_ID, style::CURSOR_KEYFRAMES)?;
    host.append(Some(&code), &cursor)?;

    Ok(Some(cursor))
}
