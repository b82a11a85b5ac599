use std::rc::Rc;

use gloo_console::error as console_error;
use gloo_events::EventListener;
use tracing::{Level, info, warn};

use common::{Site, SiteConfig, page::Document};

mod browser;
use browser::BrowserHost;

mod console;
use console::ConsoleSink;

// optional overrides, embedded in the page as
//   <script type="application/toml" id="site-config"> [config.navbar] ... </script>
const CONFIG_ELEMENT_ID: &str = "site-config";

fn main() {
    dioxus_logger::init(Level::DEBUG).expect("failed to init logger");

    let host = match BrowserHost::new() {
        Ok(host) => host,
        Err(err) => {
            console_error!(format!("Failed to attach to the page: {err}"));
            return;
        }
    };

    // the module may load before the markup has been parsed
    if host.document().ready_state() == "loading" {
        let document = host.document().clone();
        EventListener::once(&document, "DOMContentLoaded", move |_| mount(host)).forget();
    } else {
        mount(host);
    }
}

fn load_config(host: &BrowserHost) -> SiteConfig {
    let Some(doc) = host
        .by_id(CONFIG_ELEMENT_ID)
        .and_then(|node| node.text_content())
    else {
        return SiteConfig::default();
    };

    SiteConfig::from_toml(&doc).unwrap_or_else(|err| {
        warn!("ignoring malformed site config: {err}");
        SiteConfig::default()
    })
}

fn mount(host: Rc<BrowserHost>) {
    let config = load_config(&host);

    // the host owns the listeners and the listeners own the components, so everything stays
    // alive for the life of the page once this returns
    let _site = Site::mount(host, &config, Rc::new(ConsoleSink));

    info!("portfolio ready");
}
