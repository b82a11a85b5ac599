use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
    time::Duration,
};

use anyhow::Result;
use gloo_events::{EventListener, EventListenerOptions};
use gloo_render::{AnimationFrame, request_animation_frame};
use gloo_timers::callback::Timeout;
use js_sys::Array;
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{
    Element, EventTarget, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    ScrollBehavior, ScrollToOptions, Window,
};

use common::page::{
    self, DomEvent, EventFlow, EventKind, Events, Handler, IntersectHandler, ListenerId,
    ObserveOptions, Observer, Scheduler, StyleRule, Styler, Target, Viewport,
};

type IntersectCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

// wraps a javascript exception so it can travel as an anyhow::Error
fn js_error(context: &'static str) -> impl FnOnce(JsValue) -> anyhow::Error {
    move |err| anyhow::Error::msg(format!("{context}: {err:?}"))
}

// the real page
//
// listeners and observers registered through the host are owned by it.  a listener is removed
// from the page when its id is unlistened; observers live as long as the page does
pub struct BrowserHost {
    window: Window,
    document: web_sys::Document,
    listeners: RefCell<HashMap<ListenerId, EventListener>>,
    next_listener: Cell<u64>,
    observers: RefCell<Vec<(IntersectionObserver, IntersectCallback)>>,
}

impl BrowserHost {
    pub fn new() -> Result<Rc<Self>> {
        let window = web_sys::window().ok_or_else(|| anyhow::Error::msg("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::Error::msg("no document"))?;

        Ok(Rc::new(BrowserHost {
            window,
            document,
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(0),
            observers: RefCell::new(Vec::new()),
        }))
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }

    fn html(node: &Element) -> Option<&HtmlElement> {
        node.dyn_ref::<HtmlElement>()
    }
}

impl page::Document for BrowserHost {
    type Node = Element;

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn sibling_index(&self, node: &Element) -> Option<usize> {
        let siblings = node.parent_element()?.children();
        (0..siblings.length())
            .position(|i| siblings.item(i).as_ref() == Some(node))
    }

    fn set_class(&self, node: &Element, class: &str, on: bool) {
        if let Err(err) = node.class_list().toggle_with_force(class, on) {
            warn!("failed to set class {class}: {err:?}");
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn markup(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn set_markup(&self, node: &Element, markup: &str) {
        node.set_inner_html(markup);
    }

    fn set_disabled(&self, node: &Element, disabled: bool) {
        let result = if disabled {
            node.set_attribute("disabled", "")
        } else {
            node.remove_attribute("disabled")
        };
        if let Err(err) = result {
            warn!("failed to toggle disabled: {err:?}");
        }
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn reset_form(&self, form: &Element) {
        if let Some(form) = form.dyn_ref::<HtmlFormElement>() {
            form.reset();
        }
    }

    fn create(&self, tag: &str, class: &str) -> Result<Element> {
        let node = self
            .document
            .create_element(tag)
            .map_err(js_error("create element"))?;
        if !class.is_empty() {
            node.set_class_name(class);
        }
        Ok(node)
    }

    fn append(&self, parent: Option<&Element>, child: &Element) -> Result<()> {
        let result = match (parent, self.document.body()) {
            (Some(parent), _) => parent.append_child(child),
            (None, Some(body)) => body.append_child(child),
            (None, None) => return Err(anyhow::Error::msg("no body")),
        };
        result.map_err(js_error("append child"))?;
        Ok(())
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn is_attached(&self, node: &Element) -> bool {
        node.is_connected()
    }
}

impl Viewport for BrowserHost {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    fn scroll_to(&self, top: f64, smooth: bool) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Auto
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn document_top(&self, node: &Element) -> f64 {
        node.get_bounding_client_rect().top() + self.scroll_y()
    }

    fn offset_top(&self, node: &Element) -> f64 {
        Self::html(node).map_or(0.0, |n| n.offset_top() as f64)
    }

    fn offset_height(&self, node: &Element) -> f64 {
        Self::html(node).map_or(0.0, |n| n.offset_height() as f64)
    }
}

impl Styler for BrowserHost {
    fn apply_style(&self, node: &Element, rules: &[StyleRule]) {
        let Some(node) = Self::html(node) else {
            return;
        };
        let style = node.style();
        for (property, value) in rules {
            if let Err(err) = style.set_property(property, value) {
                warn!("failed to set {property}: {err:?}");
            }
        }
    }

    fn install_stylesheet(&self, id: &str, css: &str) -> Result<()> {
        if self.document.get_element_by_id(id).is_some() {
            return Ok(());
        }

        let sheet = self
            .document
            .create_element("style")
            .map_err(js_error("create style"))?;
        sheet.set_id(id);
        sheet.set_text_content(Some(css));

        self.document
            .head()
            .ok_or_else(|| anyhow::Error::msg("no head"))?
            .append_child(&sheet)
            .map_err(js_error("append style"))?;
        Ok(())
    }
}

impl Events for BrowserHost {
    fn listen(
        &self,
        target: Target<Element>,
        kind: EventKind,
        handler: Handler<Element>,
    ) -> ListenerId {
        let target: EventTarget = match target {
            Target::Window => self.window.clone().into(),
            Target::Document => self.document.clone().into(),
            Target::Node(node) => node.into(),
        };

        // anchors and the contact form need to cancel navigation, so listeners cannot be passive
        let listener = EventListener::new_with_options(
            &target,
            kind.name(),
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let dom_event = DomEvent {
                    target: event
                        .target()
                        .and_then(|t| t.dyn_into::<Element>().ok()),
                };
                if handler(&dom_event) == EventFlow::PreventDefault {
                    event.prevent_default();
                }
            },
        );

        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().insert(id, listener);
        id
    }

    // dropping the gloo listener detaches it; wasm-bindgen defers freeing the closure until a
    // call that is still running on it returns
    fn unlisten(&self, id: ListenerId) {
        let listener = self.listeners.borrow_mut().remove(&id);
        drop(listener);
    }
}

impl Observer for BrowserHost {
    fn observe(
        &self,
        nodes: &[Element],
        options: &ObserveOptions,
        handler: IntersectHandler<Element>,
    ) -> Result<()> {
        let callback: IntersectCallback =
            Closure::new(move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    if handler(&target) {
                        observer.unobserve(&target);
                    }
                }
            });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(js_error("create intersection observer"))?;
        for node in nodes {
            observer.observe(node);
        }

        self.observers.borrow_mut().push((observer, callback));
        Ok(())
    }
}

impl Scheduler for BrowserHost {
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task).forget();
    }

    // the frame handle cancels on drop, so it is parked in a slot that the callback empties
    fn request_frame(&self, task: Box<dyn FnOnce()>) {
        let slot: Rc<RefCell<Option<AnimationFrame>>> = Rc::default();
        let handle = slot.clone();
        let frame = request_animation_frame(move |_| {
            handle.borrow_mut().take();
            task();
        });
        *slot.borrow_mut() = Some(frame);
    }
}
