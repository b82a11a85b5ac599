use std::rc::Rc;

use crate::{config::HighlightConfig, page::Host};

// index of the first span containing pos, with spans given as (top, height)
//
// sections are expected to be ordered and non-overlapping; if they do overlap, the earliest one
// in document order wins.  a position in a gap matches nothing
pub fn active_section(pos: f64, spans: &[(f64, f64)]) -> Option<usize> {
    spans
        .iter()
        .position(|(top, height)| pos >= *top && pos < top + height)
}

pub struct ActiveLinkHighlighter<H: Host> {
    host: Rc<H>,
    sections: Vec<(H::Node, String)>,
    links: Vec<H::Node>,
    config: HighlightConfig,
}

impl<H: Host> ActiveLinkHighlighter<H> {
    pub fn attach(host: Rc<H>, config: &HighlightConfig) -> Rc<Self> {
        let sections = host
            .query_all(&config.section_selector)
            .into_iter()
            .filter_map(|section| {
                let id = host.attribute(&section, "id")?;
                Some((section, id))
            })
            .collect();
        let links = host.query_all(&config.link_selector);

        let highlighter = Rc::new(ActiveLinkHighlighter {
            host,
            sections,
            links,
            config: config.clone(),
        });
        highlighter.update();
        highlighter
    }

    // section geometry is read on every pass since layout shifts as images load
    pub fn current(&self) -> Option<&str> {
        let pos = self.host.scroll_y() + self.config.offset;
        let spans: Vec<_> = self
            .sections
            .iter()
            .map(|(node, _)| (self.host.offset_top(node), self.host.offset_height(node)))
            .collect();

        active_section(pos, &spans).map(|index| self.sections[index].1.as_str())
    }

    pub fn update(&self) {
        let Some(id) = self.current() else {
            return;
        };

        let href = format!("#{id}");
        for link in &self.links {
            let active = self.host.attribute(link, "href").as_deref() == Some(href.as_str());
            self.host.set_class(link, &self.config.active_class, active);
        }
    }
}
