use std::{cell::RefCell, rc::Rc};

use anyhow::Result;
use tracing::debug;

use crate::{
    config::RevealConfig,
    page::{Host, ObserveOptions},
    style,
};

// one-shot fade/slide-in of content cards
//
// the element set is fixed when the animator is attached.  each element is revealed on its first
// intersection and then dropped from observation, so scrolling away never hides it again
pub struct ScrollReveal<H: Host> {
    host: Rc<H>,
    elements: Vec<H::Node>,
    revealed: RefCell<Vec<H::Node>>,
    stagger_ms: u64,
}

impl<H: Host> ScrollReveal<H> {
    pub fn attach(host: Rc<H>, config: &RevealConfig) -> Result<Option<Rc<Self>>> {
        let elements = host.query_all(&config.selectors.join(", "));
        if elements.is_empty() {
            return Ok(None);
        }
        debug!("watching {} elements for reveal", elements.len());

        let reveal = Rc::new(ScrollReveal {
            host: host.clone(),
            elements,
            revealed: RefCell::new(Vec::new()),
            stagger_ms: config.stagger_ms,
        });

        // hide only once the observer exists; a refused observer leaves the cards visible
        let options = ObserveOptions {
            threshold: config.threshold,
            root_margin: config.root_margin.clone(),
        };
        let observer = reveal.clone();
        host.observe(
            &reveal.elements,
            &options,
            Box::new(move |node: &H::Node| observer.reveal(node)),
        )?;

        for element in &reveal.elements {
            if !reveal.is_revealed(element) {
                host.apply_style(element, &style::reveal_hidden());
            }
        }

        Ok(Some(reveal))
    }

    pub fn elements(&self) -> &[H::Node] {
        &self.elements
    }

    pub fn is_revealed(&self, node: &H::Node) -> bool {
        self.revealed.borrow().contains(node)
    }

    pub fn delay_for(&self, node: &H::Node) -> u64 {
        self.host
            .sibling_index(node)
            .map_or(0, |index| index as u64 * self.stagger_ms)
    }

    // returns true once the node no longer needs watching
    pub fn reveal(&self, node: &H::Node) -> bool {
        if self.is_revealed(node) {
            return true;
        }

        self.host
            .apply_style(node, &style::reveal_shown(self.delay_for(node)));
        self.revealed.borrow_mut().push(node.clone());
        true
    }
}
