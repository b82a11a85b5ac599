use std::rc::Rc;

use tracing::debug;

use crate::{
    config::{AnchorConfig, BackToTopConfig},
    page::{EventFlow, Host},
};

// in-page anchor navigation
//
// anchors are resolved at click time, so sections added after load still work.  the navbar is
// fixed, so the target is offset by its current rendered height to keep headings visible
pub struct SmoothScroll<H: Host> {
    host: Rc<H>,
    links: Vec<H::Node>,
    navbar: Option<H::Node>,
    smooth: bool,
}

impl<H: Host> SmoothScroll<H> {
    pub fn attach(host: Rc<H>, config: &AnchorConfig, navbar: Option<H::Node>) -> Rc<Self> {
        let links = host.query_all(&config.selector);
        debug!("routing {} in-page anchors", links.len());

        Rc::new(SmoothScroll {
            host,
            links,
            navbar,
            smooth: config.smooth,
        })
    }

    pub fn links(&self) -> &[H::Node] {
        &self.links
    }

    // where the page would scroll for this href, if anywhere
    pub fn target_offset(&self, href: &str) -> Option<f64> {
        if href == "#" {
            return None;
        }

        let target = self.host.query(href)?;
        let navbar_height = self
            .navbar
            .as_ref()
            .map_or(0.0, |navbar| self.host.offset_height(navbar));

        Some(self.host.document_top(&target) - navbar_height)
    }

    pub fn on_click(&self, link: &H::Node) -> EventFlow {
        let Some(href) = self.host.attribute(link, "href") else {
            return EventFlow::Continue;
        };

        match self.target_offset(&href) {
            Some(top) => {
                self.host.scroll_to(top, self.smooth);
                EventFlow::PreventDefault
            }
            None => EventFlow::Continue,
        }
    }
}

pub struct BackToTop<H: Host> {
    host: Rc<H>,
    button: H::Node,
    config: BackToTopConfig,
}

impl<H: Host> BackToTop<H> {
    pub fn attach(host: Rc<H>, config: &BackToTopConfig) -> Option<Rc<Self>> {
        let button = host.by_id(&config.id)?;

        let control = Rc::new(BackToTop {
            host,
            button,
            config: config.clone(),
        });
        control.update();
        Some(control)
    }

    pub fn button(&self) -> &H::Node {
        &self.button
    }

    pub fn update(&self) {
        let visible = self.host.scroll_y() > self.config.threshold;
        self.host
            .set_class(&self.button, &self.config.visible_class, visible);
    }

    pub fn on_click(&self) {
        self.host.scroll_to(0.0, true);
    }
}
