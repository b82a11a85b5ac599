use gloo_console::{error as console_error, log as console_log};
use tracing::info;

use api::ContactDraft;
use common::ContactSink;

// stands in for real delivery until the page has a backend to post to
#[derive(Clone, Debug, Default)]
pub struct ConsoleSink;

impl ContactSink for ConsoleSink {
    fn deliver(&self, draft: &ContactDraft) {
        info!(name = %draft.name, "contact form submitted");

        match serde_json::to_string(draft) {
            Ok(json) => console_log!("Form submitted:", json),
            Err(err) => console_error!(format!("Failed to serialize form draft: {err}")),
        }
    }
}
