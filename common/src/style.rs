use constcat::concat;

use api::NotificationKind;

use crate::page::StyleRule;

// stylesheets injected at runtime
//
// the page's own css knows nothing about toasts or the typing cursor, so their keyframes are
// installed on first use under a fixed id

pub const NOTIFICATION_SHEET_ID: &str = "notification-styles";
pub const CURSOR_SHEET_ID: &str = "cursor-styles";

const SLIDE_UP_FROM: &str = "from { transform: translateX(-50%) translateY(100px); opacity: 0; }";
const SLIDE_UP_TO: &str = "to { transform: translateX(-50%) translateY(0); opacity: 1; }";

pub const NOTIFICATION_KEYFRAMES: &str =
    concat!("@keyframes slideUp { ", SLIDE_UP_FROM, " ", SLIDE_UP_TO, " }");

pub const CURSOR_KEYFRAMES: &str =
    "@keyframes blink { 0%, 100% { opacity: 1; } 50% { opacity: 0; } }";

fn rules(pairs: &[(&'static str, &str)]) -> Vec<StyleRule> {
    pairs
        .iter()
        .map(|(property, value)| (*property, (*value).to_owned()))
        .collect()
}

// fixed, bottom-center banner
pub fn toast(kind: NotificationKind) -> Vec<StyleRule> {
    rules(&[
        ("position", "fixed"),
        ("bottom", "30px"),
        ("left", "50%"),
        ("transform", "translateX(-50%)"),
        ("padding", "1rem 2rem"),
        ("border-radius", "0.75rem"),
        ("font-size", "0.875rem"),
        ("font-weight", "500"),
        ("display", "flex"),
        ("align-items", "center"),
        ("gap", "1rem"),
        ("z-index", "10000"),
        ("animation", "slideUp 0.3s ease"),
        ("background", kind.to_css_color()),
        ("color", "white"),
        ("box-shadow", "0 10px 25px rgba(0, 0, 0, 0.3)"),
    ])
}

pub fn cursor() -> Vec<StyleRule> {
    rules(&[("animation", "blink 1s infinite"), ("color", "#6366f1")])
}

// reveal states

pub fn reveal_hidden() -> Vec<StyleRule> {
    rules(&[
        ("opacity", "0"),
        ("transform", "translateY(30px)"),
        ("transition", "opacity 0.6s ease, transform 0.6s ease"),
    ])
}

pub fn reveal_shown(delay_ms: u64) -> Vec<StyleRule> {
    vec![
        ("transition-delay", format!("{delay_ms}ms")),
        ("opacity", String::from("1")),
        ("transform", String::from("translateY(0)")),
    ]
}
