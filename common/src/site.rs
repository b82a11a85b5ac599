use std::rc::Rc;

use tracing::{debug, error, info};

use crate::{
    config::SiteConfig,
    contact::{ContactForm, ContactSink},
    cosmetic,
    highlight::ActiveLinkHighlighter,
    menu::MobileMenu,
    navbar::NavbarWatcher,
    notify::Notifier,
    page::{DomEvent, EventFlow, EventKind, Host, Target},
    reveal::ScrollReveal,
    scroll::{BackToTop, SmoothScroll},
};

// composition root
//
// builds every behavior once the page is ready, runs their initial passes, and hooks them up to
// browser events.  the components never talk to each other; the only thing they share is the
// page itself (e.g. the router reads the navbar's height)
pub struct Site<H: Host> {
    pub navbar: Option<Rc<NavbarWatcher<H>>>,
    pub menu: Option<Rc<MobileMenu<H>>>,
    pub router: Rc<SmoothScroll<H>>,
    pub back_to_top: Option<Rc<BackToTop<H>>>,
    pub notifier: Rc<Notifier<H>>,
    pub contact: Option<Rc<ContactForm<H>>>,
    pub reveal: Option<Rc<ScrollReveal<H>>>,
    pub highlighter: Rc<ActiveLinkHighlighter<H>>,
}

impl<H: Host> Site<H> {
    pub fn mount(host: Rc<H>, config: &SiteConfig, sink: Rc<dyn ContactSink>) -> Self {
        info!("mounting portfolio behaviors");

        let navbar = NavbarWatcher::attach(host.clone(), &config.navbar);
        let menu = MobileMenu::attach(host.clone(), &config.menu);
        let router = SmoothScroll::attach(
            host.clone(),
            &config.anchors,
            navbar.as_ref().map(|n| n.navbar().clone()),
        );
        let back_to_top = BackToTop::attach(host.clone(), &config.back_to_top);
        let notifier = Notifier::new(host.clone(), config.notification.dismiss_after());
        let contact = ContactForm::attach(host.clone(), &config.contact, notifier.clone(), sink);
        let reveal = ScrollReveal::attach(host.clone(), &config.reveal).unwrap_or_else(|err| {
            error!("scroll reveal disabled: {err}");
            None
        });
        let highlighter = ActiveLinkHighlighter::attach(host.clone(), &config.highlight);

        if !cosmetic::inject_year(host.as_ref(), &config.cosmetic, cosmetic::this_year()) {
            debug!("no year placeholder on the page");
        }
        if let Err(err) = cosmetic::append_cursor(host.as_ref(), &config.cosmetic) {
            error!("failed to add typing cursor: {err}");
        }

        let site = Site {
            navbar,
            menu,
            router,
            back_to_top,
            notifier,
            contact,
            reveal,
            highlighter,
        };
        site.wire(host.as_ref());
        site
    }

    fn wire(&self, host: &H) {
        if let Some(navbar) = self.navbar.clone() {
            on_scroll(host, move || navbar.on_scroll());
        }

        if let Some(back_to_top) = self.back_to_top.clone() {
            let button = back_to_top.button().clone();
            let scroller = back_to_top.clone();
            on_scroll(host, move || scroller.update());
            on_click(host, Target::Node(button), move |_| {
                back_to_top.on_click();
                EventFlow::Continue
            });
        }

        let highlighter = self.highlighter.clone();
        on_scroll(host, move || highlighter.update());

        if let Some(menu) = self.menu.clone() {
            let toggler = menu.clone();
            on_click(host, Target::Node(menu.toggle_node().clone()), move |_| {
                toggler.toggle();
                EventFlow::Continue
            });

            for link in menu.links() {
                let closer = menu.clone();
                on_click(host, Target::Node(link.clone()), move |_| {
                    closer.close();
                    EventFlow::Continue
                });
            }

            on_click(host, Target::Document, move |event| {
                menu.on_document_click(event.target.as_ref());
                EventFlow::Continue
            });
        }

        for link in self.router.links() {
            let router = self.router.clone();
            let anchor = link.clone();
            on_click(host, Target::Node(link.clone()), move |_| router.on_click(&anchor));
        }

        if let Some(contact) = self.contact.clone() {
            let form = contact.form().clone();
            host.listen(
                Target::Node(form),
                EventKind::Submit,
                Box::new(move |_: &DomEvent<H::Node>| contact.on_submit()),
            );
        }
    }
}

fn on_scroll<H: Host>(host: &H, handler: impl Fn() + 'static) {
    host.listen(
        Target::Window,
        EventKind::Scroll,
        Box::new(move |_: &DomEvent<H::Node>| {
            handler();
            EventFlow::Continue
        }),
    );
}

fn on_click<H: Host>(
    host: &H,
    target: Target<H::Node>,
    handler: impl Fn(&DomEvent<H::Node>) -> EventFlow + 'static,
) {
    host.listen(target, EventKind::Click, Box::new(handler));
}
