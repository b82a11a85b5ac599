// an in-memory page implementing every host capability
//
// geometry is supplied by the test (there is no layout engine), event dispatch bubbles clicks
// from the target up to the document, and time only moves when the test advances it

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
    time::Duration,
};

use anyhow::Result;

use crate::page::{
    Document, DomEvent, EventFlow, EventKind, Events, Handler, IntersectHandler, ListenerId,
    ObserveOptions, Observer, Scheduler, StyleRule, Styler, Target, Viewport,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

pub const BODY: NodeId = NodeId(0);

#[derive(Debug, Default)]
struct FakeNode {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    style: BTreeMap<String, String>,
    top: f64,
    height: f64,
}

type SharedHandler = Rc<dyn Fn(&DomEvent<NodeId>) -> EventFlow>;

struct Listener {
    id: ListenerId,
    target: Target<NodeId>,
    kind: EventKind,
    handler: SharedHandler,
}

struct Registration {
    watched: Vec<NodeId>,
    options: ObserveOptions,
    handler: Rc<dyn Fn(&NodeId) -> bool>,
}

struct Timer {
    due: u64,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
pub struct FakePage {
    nodes: RefCell<Vec<FakeNode>>,
    stylesheets: RefCell<BTreeMap<String, String>>,
    scroll_y: Cell<f64>,
    scrolls: RefCell<Vec<(f64, bool)>>,
    handlers: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    observers: RefCell<Vec<Registration>>,
    now: Cell<u64>,
    seq: Cell<u64>,
    timers: RefCell<Vec<Timer>>,
    frames: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl FakePage {
    pub fn new() -> Rc<Self> {
        let page = FakePage::default();
        page.nodes.borrow_mut().push(FakeNode {
            tag: String::from("body"),
            ..Default::default()
        });
        Rc::new(page)
    }

    // building

    pub fn add(&self, parent: NodeId, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(FakeNode {
            tag: tag.to_owned(),
            parent: Some(parent),
            ..Default::default()
        });
        nodes[parent.0].children.push(id);
        id
    }

    pub fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attrs
            .insert(name.to_owned(), value.to_owned());
    }

    pub fn set_geometry(&self, node: NodeId, top: f64, height: f64) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[node.0].top = top;
        nodes[node.0].height = height;
    }

    pub fn set_value(&self, node: NodeId, value: &str) {
        self.nodes.borrow_mut()[node.0].value = value.to_owned();
    }

    // inspection

    pub fn text(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.nodes.borrow()[node.0].disabled
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].style.get(property).cloned()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn stylesheet(&self, id: &str) -> Option<String> {
        self.stylesheets.borrow().get(id).cloned()
    }

    pub fn stylesheet_count(&self) -> usize {
        self.stylesheets.borrow().len()
    }

    pub fn scrolls(&self) -> Vec<(f64, bool)> {
        self.scrolls.borrow().clone()
    }

    pub fn observe_options(&self) -> Vec<ObserveOptions> {
        self.observers
            .borrow()
            .iter()
            .map(|r| r.options.clone())
            .collect()
    }

    pub fn watched(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .map(|r| r.watched.len())
            .sum()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn listener_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    // driving

    // sets the scroll offset and fires the window scroll handlers
    pub fn scroll(&self, y: f64) {
        self.scroll_y.set(y);
        let event = DomEvent { target: None };
        for handler in self.handlers_for(&[Target::Window], EventKind::Scroll) {
            handler(&event);
        }
    }

    // returns true if any handler prevented the default action
    pub fn click(&self, node: NodeId) -> bool {
        let mut path = vec![Target::Node(node)];
        let mut cursor = self.nodes.borrow()[node.0].parent;
        while let Some(parent) = cursor {
            path.push(Target::Node(parent));
            cursor = self.nodes.borrow()[parent.0].parent;
        }
        path.push(Target::Document);

        self.dispatch(&path, EventKind::Click, Some(node))
    }

    pub fn submit(&self, form: NodeId) -> bool {
        self.dispatch(&[Target::Node(form)], EventKind::Submit, Some(form))
    }

    pub fn intersect(&self, node: NodeId) {
        let handlers: Vec<_> = self
            .observers
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.watched.contains(&node))
            .map(|(i, r)| (i, r.handler.clone()))
            .collect();

        for (index, handler) in handlers {
            if handler(&node) {
                self.observers.borrow_mut()[index]
                    .watched
                    .retain(|n| *n != node);
            }
        }
    }

    pub fn run_frames(&self) -> usize {
        let frames: Vec<_> = self.frames.borrow_mut().drain(..).collect();
        let count = frames.len();
        for frame in frames {
            frame();
        }
        count
    }

    // runs every timer due within the window, in due order
    pub fn advance(&self, delay: Duration) {
        let until = self.now.get() + delay.as_millis() as u64;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let earliest = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= until)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                earliest.map(|i| timers.remove(i))
            };
            match next {
                Some(timer) => {
                    self.now.set(timer.due);
                    (timer.task)();
                }
                None => break,
            }
        }
        self.now.set(until);
    }

    fn dispatch(&self, path: &[Target<NodeId>], kind: EventKind, target: Option<NodeId>) -> bool {
        let event = DomEvent { target };
        let mut prevented = false;
        for handler in self.handlers_for(path, kind) {
            if handler(&event) == EventFlow::PreventDefault {
                prevented = true;
            }
        }
        prevented
    }

    // handlers are cloned out first so that they are free to register more listeners
    fn handlers_for(&self, path: &[Target<NodeId>], kind: EventKind) -> Vec<SharedHandler> {
        let handlers = self.handlers.borrow();
        path.iter()
            .flat_map(|step| {
                handlers
                    .iter()
                    .filter(move |l| l.target == *step && l.kind == kind)
                    .map(|l| l.handler.clone())
            })
            .collect()
    }

    fn preorder(&self) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut order = Vec::new();
        let mut stack = vec![BODY];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(nodes[id.0].children.iter().rev());
        }
        order
    }

    fn matches(&self, node: NodeId, selector: &[Compound]) -> bool {
        let Some((last, rest)) = selector.split_last() else {
            return false;
        };
        if !self.matches_compound(node, last) {
            return false;
        }

        // descendant combinators, matched greedily against the nearest ancestors
        let mut remaining = rest.iter().rev().peekable();
        let mut cursor = self.nodes.borrow()[node.0].parent;
        while let (Some(want), Some(id)) = (remaining.peek(), cursor) {
            if self.matches_compound(id, want) {
                remaining.next();
            }
            cursor = self.nodes.borrow()[id.0].parent;
        }
        remaining.peek().is_none()
    }

    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        let nodes = self.nodes.borrow();
        let n = &nodes[node.0];

        compound.tag.as_ref().is_none_or(|t| *t == n.tag)
            && compound
                .id
                .as_ref()
                .is_none_or(|id| n.attrs.get("id") == Some(id))
            && compound.classes.iter().all(|c| n.classes.contains(c))
            && compound.attrs.iter().all(|(name, prefix)| {
                match (n.attrs.get(name), prefix) {
                    (Some(v), Some(p)) => v.starts_with(p.as_str()),
                    (Some(_), None) => true,
                    (None, _) => false,
                }
            })
    }
}

// a deliberately small subset of css: tag, #id, .class, [attr], [attr^="prefix"],
// descendant combinators and comma-separated lists
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

fn ident(chars: &[char], pos: &mut usize) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() && (chars[*pos].is_alphanumeric() || "-_".contains(chars[*pos])) {
        *pos += 1;
    }
    let ident: String = chars[start..*pos].iter().collect();
    match ident.chars().next() {
        Some(c) if !c.is_ascii_digit() => Some(ident),
        _ => None,
    }
}

fn parse_compound(text: &str) -> Option<Compound> {
    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    if chars.first().is_some_and(|c| c.is_alphabetic()) {
        compound.tag = Some(ident(&chars, &mut pos)?);
    }
    while pos < chars.len() {
        let sigil = chars[pos];
        pos += 1;
        match sigil {
            '#' => compound.id = Some(ident(&chars, &mut pos)?),
            '.' => compound.classes.push(ident(&chars, &mut pos)?),
            '[' => {
                let close = chars[pos..].iter().position(|c| *c == ']')? + pos;
                let inner: String = chars[pos..close].iter().collect();
                pos = close + 1;
                match inner.split_once("^=") {
                    Some((name, prefix)) => compound.attrs.push((
                        name.trim().to_owned(),
                        Some(prefix.trim().trim_matches('"').to_owned()),
                    )),
                    None => compound.attrs.push((inner.trim().to_owned(), None)),
                }
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn parse_selector(selector: &str) -> Option<Vec<Vec<Compound>>> {
    selector
        .split(',')
        .map(|part| {
            let compounds = part
                .split_whitespace()
                .map(parse_compound)
                .collect::<Option<Vec<_>>>()?;
            (!compounds.is_empty()).then_some(compounds)
        })
        .collect()
}

// one to four lengths, each in px or %
fn is_root_margin(margin: &str) -> bool {
    let parts: Vec<_> = margin.split_whitespace().collect();
    (1..=4).contains(&parts.len())
        && parts.iter().all(|part| {
            part.strip_suffix("px")
                .or_else(|| part.strip_suffix('%'))
                .is_some_and(|n| n.parse::<f64>().is_ok())
        })
}

impl Document for FakePage {
    type Node = NodeId;

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.preorder()
            .into_iter()
            .find(|n| self.nodes.borrow()[n.0].attrs.get("id").map(String::as_str) == Some(id))
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let Some(list) = parse_selector(selector) else {
            return Vec::new();
        };
        self.preorder()
            .into_iter()
            .filter(|n| *n != BODY && list.iter().any(|s| self.matches(*n, s)))
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(*node);
        while let Some(id) = cursor {
            if id == *ancestor {
                return true;
            }
            cursor = nodes[id.0].parent;
        }
        false
    }

    fn sibling_index(&self, node: &NodeId) -> Option<usize> {
        let nodes = self.nodes.borrow();
        let parent = nodes[node.0].parent?;
        nodes[parent.0].children.iter().position(|c| c == node)
    }

    fn set_class(&self, node: &NodeId, class: &str, on: bool) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        let present = classes.iter().any(|c| c == class);
        if on && !present {
            classes.push(class.to_owned());
        } else if !on {
            classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.nodes.borrow_mut()[node.0].text = text.to_owned();
    }

    fn markup(&self, node: &NodeId) -> String {
        self.text(*node)
    }

    fn set_markup(&self, node: &NodeId, markup: &str) {
        self.set_text(node, markup);
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) {
        self.nodes.borrow_mut()[node.0].disabled = disabled;
    }

    fn value(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].value.clone()
    }

    fn reset_form(&self, form: &NodeId) {
        let fields: Vec<_> = self
            .preorder()
            .into_iter()
            .filter(|n| n != form && self.contains(form, n))
            .collect();
        let mut nodes = self.nodes.borrow_mut();
        for field in fields {
            nodes[field.0].value.clear();
        }
    }

    fn create(&self, tag: &str, class: &str) -> Result<NodeId> {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(FakeNode {
            tag: tag.to_owned(),
            classes: class.split_whitespace().map(str::to_owned).collect(),
            ..Default::default()
        });
        Ok(id)
    }

    fn append(&self, parent: Option<&NodeId>, child: &NodeId) -> Result<()> {
        let parent = parent.copied().unwrap_or(BODY);
        self.remove(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(*child);
        Ok(())
    }

    fn remove(&self, node: &NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| c != node);
        }
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        self.contains(&BODY, node)
    }
}

impl Viewport for FakePage {
    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn scroll_to(&self, top: f64, smooth: bool) {
        self.scroll_y.set(top);
        self.scrolls.borrow_mut().push((top, smooth));
    }

    fn document_top(&self, node: &NodeId) -> f64 {
        self.nodes.borrow()[node.0].top
    }

    fn offset_top(&self, node: &NodeId) -> f64 {
        self.nodes.borrow()[node.0].top
    }

    fn offset_height(&self, node: &NodeId) -> f64 {
        self.nodes.borrow()[node.0].height
    }
}

impl Styler for FakePage {
    fn apply_style(&self, node: &NodeId, rules: &[StyleRule]) {
        let mut nodes = self.nodes.borrow_mut();
        let style = &mut nodes[node.0].style;
        for (property, value) in rules {
            style.insert((*property).to_owned(), value.clone());
        }
    }

    fn install_stylesheet(&self, id: &str, css: &str) -> Result<()> {
        self.stylesheets
            .borrow_mut()
            .entry(id.to_owned())
            .or_insert_with(|| css.to_owned());
        Ok(())
    }
}

impl Events for FakePage {
    fn listen(
        &self,
        target: Target<NodeId>,
        kind: EventKind,
        handler: Handler<NodeId>,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.handlers.borrow_mut().push(Listener {
            id,
            target,
            kind,
            handler: Rc::from(handler),
        });
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.handlers.borrow_mut().retain(|l| l.id != id);
    }
}

impl Observer for FakePage {
    fn observe(
        &self,
        nodes: &[NodeId],
        options: &ObserveOptions,
        handler: IntersectHandler<NodeId>,
    ) -> Result<()> {
        // the browser throws a SyntaxError here
        if !is_root_margin(&options.root_margin) {
            anyhow::bail!("invalid root margin {:?}", options.root_margin);
        }
        self.observers.borrow_mut().push(Registration {
            watched: nodes.to_vec(),
            options: options.clone(),
            handler: Rc::from(handler),
        });
        Ok(())
    }
}

impl Scheduler for FakePage {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + delay.as_millis() as u64,
            seq,
            task,
        });
    }

    fn request_frame(&self, task: Box<dyn FnOnce()>) {
        self.frames.borrow_mut().push(task);
    }
}

// the portfolio skeleton the site expects, with made-up but consistent geometry
pub struct Portfolio {
    pub page: Rc<FakePage>,
    pub navbar: NodeId,
    pub toggle: NodeId,
    pub menu: NodeId,
    pub links: Vec<NodeId>,
    pub sections: Vec<NodeId>,
    pub back_to_top: NodeId,
    pub form: NodeId,
    pub fields: BTreeMap<&'static str, NodeId>,
    pub submit: NodeId,
    pub cards: Vec<NodeId>,
    pub year: NodeId,
    pub code: NodeId,
}

pub const NAVBAR_HEIGHT: f64 = 80.0;

impl Portfolio {
    pub fn build() -> Self {
        let page = FakePage::new();

        let navbar = page.add(BODY, "nav");
        page.set_attr(navbar, "id", "navbar");
        page.set_geometry(navbar, 0.0, NAVBAR_HEIGHT);

        let toggle = page.add(navbar, "button");
        page.set_attr(toggle, "id", "navToggle");
        let bar = page.add(toggle, "span");
        page.set_class(&bar, "bar", true);

        let menu = page.add(navbar, "ul");
        page.set_attr(menu, "id", "navMenu");

        let mut links = Vec::new();
        for target in ["home", "about", "pricing", "contact"] {
            let item = page.add(menu, "li");
            let link = page.add(item, "a");
            page.set_class(&link, "nav-link", true);
            page.set_attr(link, "href", &format!("#{target}"));
            links.push(link);
        }

        let hero_code = page.add(BODY, "div");
        page.set_class(&hero_code, "code-body", true);
        let code = page.add(hero_code, "code");

        let mut sections = Vec::new();
        let mut top = 0.0;
        for (id, height) in [
            ("home", 700.0),
            ("about", 600.0),
            ("pricing", 900.0),
            ("contact", 800.0),
        ] {
            let section = page.add(BODY, "section");
            page.set_attr(section, "id", id);
            page.set_geometry(section, top, height);
            top += height;
            sections.push(section);
        }

        let grid = page.add(sections[2], "div");
        let mut cards = Vec::new();
        for _ in 0..3 {
            let card = page.add(grid, "div");
            page.set_class(&card, "pricing-card", true);
            cards.push(card);
        }

        let form = page.add(sections[3], "form");
        page.set_attr(form, "id", "contactForm");
        let mut fields = BTreeMap::new();
        for (id, tag) in [
            ("name", "input"),
            ("email", "input"),
            ("subject", "input"),
            ("budget", "select"),
            ("message", "textarea"),
        ] {
            let field = page.add(form, tag);
            page.set_attr(field, "id", id);
            fields.insert(id, field);
        }
        let submit = page.add(form, "button");
        page.set_class(&submit, "btn-submit", true);
        page.set_text(&submit, "<span>Send Message</span>");

        let back_to_top = page.add(BODY, "button");
        page.set_attr(back_to_top, "id", "backToTop");

        let footer = page.add(BODY, "footer");
        let year = page.add(footer, "span");
        page.set_attr(year, "id", "currentYear");

        Portfolio {
            page,
            navbar,
            toggle,
            menu,
            links,
            sections,
            back_to_top,
            form,
            fields,
            submit,
            cards,
            year,
            code,
        }
    }

    pub fn fill(&self, name: &str, email: &str, subject: &str, budget: &str, message: &str) {
        for (id, value) in [
            ("name", name),
            ("email", email),
            ("subject", subject),
            ("budget", budget),
            ("message", message),
        ] {
            self.page.set_value(self.fields[id], value);
        }
    }

    pub fn field(&self, id: &str) -> String {
        self.page.value(&self.fields[id])
    }

    pub fn notifications(&self) -> Vec<NodeId> {
        self.page.query_all(".notification")
    }
}

#[cfg(test)]
mod tests {
    use super::{BODY, FakePage, is_root_margin};
    use crate::page::Document;

    #[test]
    fn selector_subset_matches_like_css() {
        let page = FakePage::new();
        let outer = page.add(BODY, "div");
        page.set_class(&outer, "code-body", true);
        let code = page.add(outer, "code");
        let link = page.add(BODY, "a");
        page.set_attr(link, "href", "#about");
        let bare = page.add(BODY, "a");
        page.set_attr(bare, "href", "/elsewhere");

        assert_eq!(page.query(".code-body code"), Some(code));
        assert_eq!(page.query_all("a[href^=\"#\"]"), vec![link]);
        assert_eq!(page.query_all("code, .code-body"), vec![outer, code]);
    }

    #[test]
    fn invalid_selectors_match_nothing() {
        let page = FakePage::new();
        let section = page.add(BODY, "section");
        page.set_attr(section, "id", "1st");

        assert_eq!(page.query("#1st"), None);
        assert_eq!(page.query("#"), None);
        assert!(page.query_all("a[href").is_empty());
    }

    #[test]
    fn root_margins_follow_the_browser_grammar() {
        assert!(is_root_margin("0px 0px -50px 0px"));
        assert!(is_root_margin("10%"));
        assert!(!is_root_margin("bad"));
        assert!(!is_root_margin("0 0 -50px 0"));
        assert!(!is_root_margin(""));
    }
}
