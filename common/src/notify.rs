use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use anyhow::Result;
use tracing::{debug, error};

use api::NotificationKind;

use crate::{
    page::{DomEvent, EventFlow, EventKind, Host, ListenerId, Target},
    style,
};

pub const NOTIFICATION_CLASS: &str = "notification";
pub const CLOSE_CLASS: &str = "notification-close";

// single-instance toast
//
// a new toast always evicts the previous one before it is shown.  each toast carries its own
// close button and its own dismissal timer; whichever fires second finds the toast already gone
// and does nothing
pub struct Notifier<H: Host> {
    host: Rc<H>,
    dismiss_after: Duration,
    current: RefCell<Option<Rc<Toast<H>>>>,
}

impl<H: Host> Notifier<H> {
    pub fn new(host: Rc<H>, dismiss_after: Duration) -> Rc<Self> {
        Rc::new(Notifier {
            host,
            dismiss_after,
            current: RefCell::new(None),
        })
    }

    pub fn present(&self, message: &str, kind: NotificationKind) {
        self.clear();

        match self.build(message, kind) {
            Ok(toast) => *self.current.borrow_mut() = Some(toast),
            Err(err) => error!("failed to present notification: {err}"),
        }
    }

    // removes every toast currently on the page, including ones this notifier did not create
    pub fn clear(&self) {
        if let Some(toast) = self.current.borrow_mut().take() {
            toast.dismiss();
        }
        for existing in self.host.query_all(&format!(".{NOTIFICATION_CLASS}")) {
            self.host.remove(&existing);
        }
    }

    fn build(&self, message: &str, kind: NotificationKind) -> Result<Rc<Toast<H>>> {
        let host = &self.host;

        let node = host.create("div", &format!("{NOTIFICATION_CLASS} {}", kind.css_class()))?;
        let text = host.create("span", "")?;
        host.set_text(&text, message);
        let close = host.create("button", CLOSE_CLASS)?;
        host.set_markup(&close, "&times;");
        host.append(Some(&node), &text)?;
        host.append(Some(&node), &close)?;

        host.apply_style(&node, &style::toast(kind));
        host.install_stylesheet(style::NOTIFICATION_SHEET_ID, style::NOTIFICATION_KEYFRAMES)?;
        host.append(None, &node)?;

        debug!(kind = kind.css_class(), "notification shown");

        let toast = Rc::new(Toast {
            host: host.clone(),
            node,
            close_listener: Cell::new(None),
        });

        let closer = toast.clone();
        let listener = host.listen(
            Target::Node(close),
            EventKind::Click,
            Box::new(move |_: &DomEvent<H::Node>| {
                closer.dismiss();
                EventFlow::Continue
            }),
        );
        toast.close_listener.set(Some(listener));

        let timer = toast.clone();
        host.set_timeout(self.dismiss_after, Box::new(move || timer.dismiss()));

        Ok(toast)
    }
}

// a toast on the page together with the close listener that keeps it reachable
//
// the listener holds the toast and the host holds the listener, so dismissing has to hand the
// listener back or the pair outlives the node
struct Toast<H: Host> {
    host: Rc<H>,
    node: H::Node,
    close_listener: Cell<Option<ListenerId>>,
}

impl<H: Host> Toast<H> {
    fn dismiss(&self) {
        if let Some(listener) = self.close_listener.take() {
            self.host.unlisten(listener);
        }
        if self.host.is_attached(&self.node) {
            self.host.remove(&self.node);
        }
    }
}
