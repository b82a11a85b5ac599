use std::rc::Rc;

use tracing::debug;

use crate::{config::MenuConfig, page::Host};

// slide-out navigation for narrow screens
//
// the open state lives in the active class of both the toggle button and the panel.  every
// transition writes both from a single computed value so they cannot drift apart
pub struct MobileMenu<H: Host> {
    host: Rc<H>,
    toggle: H::Node,
    panel: H::Node,
    links: Vec<H::Node>,
    active_class: String,
}

impl<H: Host> MobileMenu<H> {
    pub fn attach(host: Rc<H>, config: &MenuConfig) -> Option<Rc<Self>> {
        let (Some(toggle), Some(panel)) = (
            host.by_id(&config.toggle_id),
            host.by_id(&config.panel_id),
        ) else {
            debug!("menu toggle or panel missing, skipping mobile menu");
            return None;
        };
        let links = host.query_all(&config.link_selector);

        Some(Rc::new(MobileMenu {
            host,
            toggle,
            panel,
            links,
            active_class: config.active_class.clone(),
        }))
    }

    pub fn toggle_node(&self) -> &H::Node {
        &self.toggle
    }

    pub fn links(&self) -> &[H::Node] {
        &self.links
    }

    pub fn is_open(&self) -> bool {
        self.host.has_class(&self.panel, &self.active_class)
    }

    fn set_open(&self, open: bool) {
        self.host.set_class(&self.panel, &self.active_class, open);
        self.host.set_class(&self.toggle, &self.active_class, open);
    }

    pub fn toggle(&self) {
        self.set_open(!self.is_open());
    }

    pub fn close(&self) {
        self.set_open(false);
    }

    // clicks inside the toggle or the panel are handled by their own listeners
    pub fn on_document_click(&self, target: Option<&H::Node>) {
        let inside = target.is_some_and(|t| {
            self.host.contains(&self.panel, t) || self.host.contains(&self.toggle, t)
        });
        if !inside {
            self.close();
        }
    }
}
