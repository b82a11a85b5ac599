use std::rc::Rc;

use tracing::debug;

use crate::{config::NavbarConfig, page::Host, throttle::FrameThrottle};

// no hysteresis: the threshold itself still counts as unscrolled
pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

pub struct NavbarWatcher<H: Host> {
    host: Rc<H>,
    navbar: H::Node,
    config: NavbarConfig,
    throttle: FrameThrottle,
}

impl<H: Host> NavbarWatcher<H> {
    pub fn attach(host: Rc<H>, config: &NavbarConfig) -> Option<Rc<Self>> {
        let Some(navbar) = host.by_id(&config.id) else {
            debug!("no #{} on the page, skipping navbar watcher", config.id);
            return None;
        };

        let watcher = Rc::new(NavbarWatcher {
            host,
            navbar,
            config: config.clone(),
            throttle: FrameThrottle::new(),
        });

        // a reload halfway down the page must render the compact navbar straight away
        watcher.update();
        Some(watcher)
    }

    pub fn navbar(&self) -> &H::Node {
        &self.navbar
    }

    pub fn update(&self) {
        let scrolled = is_scrolled(self.host.scroll_y(), self.config.threshold);
        self.host
            .set_class(&self.navbar, &self.config.scrolled_class, scrolled);
    }

    pub fn on_scroll(self: &Rc<Self>) {
        let watcher = self.clone();
        self.throttle
            .schedule(self.host.as_ref(), move || watcher.update());
    }
}
