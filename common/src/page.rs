use std::{fmt::Debug, time::Duration};

use anyhow::Result;

// host capabilities
//
// every behavior in this crate is written against these traits rather than against the browser
// directly.  the webapp implements them over web-sys, and the tests implement them over an
// in-memory page (see testing.rs)
//
// node handles are cheap clones that compare by identity

pub trait Document {
    type Node: Clone + Debug + PartialEq + 'static;

    fn by_id(&self, id: &str) -> Option<Self::Node>;

    // an invalid selector is not an error, it simply matches nothing
    fn query(&self, selector: &str) -> Option<Self::Node>;

    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    // true if node is ancestor or one of its descendants
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn sibling_index(&self, node: &Self::Node) -> Option<usize>;

    // presentational state flags
    fn set_class(&self, node: &Self::Node, class: &str, on: bool);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn set_text(&self, node: &Self::Node, text: &str);

    fn markup(&self, node: &Self::Node) -> String;

    fn set_markup(&self, node: &Self::Node, markup: &str);

    fn set_disabled(&self, node: &Self::Node, disabled: bool);

    // form controls
    fn value(&self, node: &Self::Node) -> String;

    fn reset_form(&self, form: &Self::Node);

    // tree mutation
    fn create(&self, tag: &str, class: &str) -> Result<Self::Node>;

    // a parent of None appends to the body
    fn append(&self, parent: Option<&Self::Node>, child: &Self::Node) -> Result<()>;

    fn remove(&self, node: &Self::Node);

    fn is_attached(&self, node: &Self::Node) -> bool;
}

pub trait Viewport: Document {
    fn scroll_y(&self) -> f64;

    fn scroll_to(&self, top: f64, smooth: bool);

    // top edge relative to the document, not the viewport
    fn document_top(&self, node: &Self::Node) -> f64;

    fn offset_top(&self, node: &Self::Node) -> f64;

    fn offset_height(&self, node: &Self::Node) -> f64;
}

// a single declarative style property, e.g. ("opacity", "0")
pub type StyleRule = (&'static str, String);

pub trait Styler: Document {
    fn apply_style(&self, node: &Self::Node, rules: &[StyleRule]);

    // installs a <style> block under the given id, unless one is already present
    fn install_stylesheet(&self, id: &str, css: &str) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Target<N> {
    Window,
    Document,
    Node(N),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    Click,
    Submit,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Click => "click",
            Self::Submit => "submit",
        }
    }
}

#[derive(Clone, Debug)]
pub struct DomEvent<N> {
    // the node the event was dispatched to, if it was dispatched to an element
    pub target: Option<N>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    PreventDefault,
}

pub type Handler<N> = Box<dyn Fn(&DomEvent<N>) -> EventFlow>;

// handed out by listen, and the only way to take a listener back off the page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

pub trait Events: Document {
    // the host owns the handler until it is unlistened, or for as long as the page lives
    fn listen(
        &self,
        target: Target<Self::Node>,
        kind: EventKind,
        handler: Handler<Self::Node>,
    ) -> ListenerId;

    // unknown or already released ids are ignored; safe to call from inside the handler itself
    fn unlisten(&self, id: ListenerId);
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObserveOptions {
    pub threshold: f64,
    pub root_margin: String,
}

// returns true once the node should no longer be watched
pub type IntersectHandler<N> = Box<dyn Fn(&N) -> bool>;

pub trait Observer: Document {
    fn observe(
        &self,
        nodes: &[Self::Node],
        options: &ObserveOptions,
        handler: IntersectHandler<Self::Node>,
    ) -> Result<()>;
}

// fire-and-forget timers; nothing here is ever cancelled
pub trait Scheduler {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>);

    fn request_frame(&self, task: Box<dyn FnOnce()>);
}

pub trait Host: Viewport + Styler + Events + Observer + Scheduler + 'static {}

impl<T> Host for T where T: Viewport + Styler + Events + Observer + Scheduler + 'static {}
