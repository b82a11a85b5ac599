// interactive behavior for the portfolio page
//
// everything here is written against the host capabilities in page.rs, so the same code runs in
// the browser (see the webapp crate) and against the in-memory page used by the tests

pub mod config;
pub mod contact;
pub mod cosmetic;
pub mod highlight;
pub mod menu;
pub mod navbar;
pub mod notify;
pub mod page;
pub mod reveal;
pub mod scroll;
pub mod site;
pub mod style;
pub mod throttle;

#[cfg(test)]
pub mod testing;

pub use config::SiteConfig;
pub use contact::ContactSink;
pub use site::Site;
