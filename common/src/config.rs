use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{Level, debug, instrument};

// site configuration
//
// every id, class, selector, threshold and delay the behaviors depend on.  the defaults match
// the markup the portfolio ships with, so an empty document is a valid configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub navbar: NavbarConfig,
    pub menu: MenuConfig,
    pub anchors: AnchorConfig,
    pub back_to_top: BackToTopConfig,
    pub contact: ContactConfig,
    pub notification: NotificationConfig,
    pub reveal: RevealConfig,
    pub highlight: HighlightConfig,
    pub cosmetic: CosmeticConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct NavbarConfig {
    pub id: String,
    pub scrolled_class: String,

    // pixels scrolled before the navbar switches to its compact look
    pub threshold: f64,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        NavbarConfig {
            id: String::from("navbar"),
            scrolled_class: String::from("scrolled"),
            threshold: 50.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuConfig {
    pub toggle_id: String,
    pub panel_id: String,
    pub link_selector: String,
    pub active_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        MenuConfig {
            toggle_id: String::from("navToggle"),
            panel_id: String::from("navMenu"),
            link_selector: String::from(".nav-link"),
            active_class: String::from("active"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AnchorConfig {
    pub selector: String,
    pub smooth: bool,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        AnchorConfig {
            selector: String::from("a[href^=\"#\"]"),
            smooth: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BackToTopConfig {
    pub id: String,
    pub visible_class: String,
    pub threshold: f64,
}

impl Default for BackToTopConfig {
    fn default() -> Self {
        BackToTopConfig {
            id: String::from("backToTop"),
            visible_class: String::from("visible"),
            threshold: 500.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactConfig {
    pub form_id: String,
    pub submit_selector: String,

    // element ids of the individual fields
    pub name_id: String,
    pub email_id: String,
    pub subject_id: String,
    pub budget_id: String,
    pub message_id: String,

    pub pending_label: String,

    // stand-in for the round trip to a real backend
    pub latency_ms: u64,

    pub missing_message: String,
    pub invalid_email_message: String,
    pub success_message: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        ContactConfig {
            form_id: String::from("contactForm"),
            submit_selector: String::from(".btn-submit"),
            name_id: String::from("name"),
            email_id: String::from("email"),
            subject_id: String::from("subject"),
            budget_id: String::from("budget"),
            message_id: String::from("message"),
            pending_label: String::from("Sending..."),
            latency_ms: 1500,
            missing_message: String::from("Please fill in all required fields."),
            invalid_email_message: String::from("Please enter a valid email address."),
            success_message: String::from("Message sent successfully! I'll get back to you soon."),
        }
    }
}

impl ContactConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub dismiss_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig { dismiss_ms: 5000 }
    }
}

impl NotificationConfig {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_ms)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selectors: Vec<String>,

    // fraction of the element that must be visible
    pub threshold: f64,
    pub root_margin: String,

    // delay added per preceding sibling
    pub stagger_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            selectors: [
                ".project-card",
                ".pricing-card",
                ".why-card",
                ".highlight-item",
                ".contact-card",
                ".about-image",
                ".about-text",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            threshold: 0.1,
            root_margin: String::from("0px 0px -50px 0px"),
            stagger_ms: 100,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub section_selector: String,
    pub link_selector: String,
    pub active_class: String,

    // how far below the top of the viewport a section counts as current
    pub offset: f64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            section_selector: String::from("section[id]"),
            link_selector: String::from(".nav-link"),
            active_class: String::from("active"),
            offset: 100.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CosmeticConfig {
    pub year_id: String,
    pub code_selector: String,
}

impl Default for CosmeticConfig {
    fn default() -> Self {
        CosmeticConfig {
            year_id: String::from("currentYear"),
            code_selector: String::from(".code-body code"),
        }
    }
}

// in order to extract the config table from a larger document, we need to specify it
// as a subtable of the root node, i.e. a substruct
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlConfigFile {
    #[serde(default)]
    config: SiteConfig,
}

impl SiteConfig {
    #[instrument(level=Level::DEBUG, skip(doc))]
    pub fn from_toml(doc: &str) -> Result<SiteConfig> {
        debug!("parsing site config");

        let data: TomlConfigFile = toml::from_str(doc)?;

        debug!("successfully parsed site config");
        Ok(data.config)
    }
}
