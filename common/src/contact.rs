use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    sync::LazyLock,
};

use regex::Regex;
use tracing::{debug, warn};

use api::{ContactDraft, ContactField, NotificationKind};

use crate::{
    config::ContactConfig,
    notify::Notifier,
    page::{EventFlow, Host},
};

// local@domain.tld with no whitespace and exactly one @
//
// the byte order mark is listed alongside \s to match what browsers count as whitespace
pub const EMAIL_REGEX: &str = r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_REGEX).expect("email pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormError {
    MissingRequired,
    InvalidEmail,
}

impl FormError {
    pub fn field(self) -> Option<ContactField> {
        match self {
            Self::MissingRequired => None,
            Self::InvalidEmail => Some(ContactField::Email),
        }
    }

    pub fn message(self, config: &ContactConfig) -> &str {
        match self {
            Self::MissingRequired => &config.missing_message,
            Self::InvalidEmail => &config.invalid_email_message,
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired => write!(f, "a required field is empty"),
            Self::InvalidEmail => write!(f, "the email address is malformed"),
        }
    }
}

impl std::error::Error for FormError {}

// first failure wins
pub fn validate(draft: &ContactDraft) -> Result<(), FormError> {
    if !draft.has_required() {
        return Err(FormError::MissingRequired);
    }
    if !is_valid_email(&draft.email) {
        return Err(FormError::InvalidEmail);
    }
    Ok(())
}

// whatever actually delivers the message
//
// the page never talks to a backend itself; it hands each validated draft over exactly once
pub trait ContactSink {
    fn deliver(&self, draft: &ContactDraft);
}

struct Fields<N> {
    name: N,
    email: N,
    subject: Option<N>,
    budget: Option<N>,
    message: N,
}

pub struct ContactForm<H: Host> {
    host: Rc<H>,
    form: H::Node,
    submit: Option<H::Node>,
    fields: Fields<H::Node>,
    notifier: Rc<Notifier<H>>,
    sink: Rc<dyn ContactSink>,
    config: ContactConfig,
    in_flight: Cell<bool>,
    saved_label: RefCell<Option<String>>,
}

impl<H: Host> ContactForm<H> {
    pub fn attach(
        host: Rc<H>,
        config: &ContactConfig,
        notifier: Rc<Notifier<H>>,
        sink: Rc<dyn ContactSink>,
    ) -> Option<Rc<Self>> {
        let form = host.by_id(&config.form_id)?;

        // the required fields are part of the form's markup; without them there is nothing to send
        let (Some(name), Some(email), Some(message)) = (
            host.by_id(&config.name_id),
            host.by_id(&config.email_id),
            host.by_id(&config.message_id),
        ) else {
            warn!("contact form is missing a required field, leaving it alone");
            return None;
        };

        let fields = Fields {
            name,
            email,
            subject: host.by_id(&config.subject_id),
            budget: host.by_id(&config.budget_id),
            message,
        };
        let submit = host
            .query_all(&config.submit_selector)
            .into_iter()
            .find(|button| host.contains(&form, button));

        Some(Rc::new(ContactForm {
            host,
            form,
            submit,
            fields,
            notifier,
            sink,
            config: config.clone(),
            in_flight: Cell::new(false),
            saved_label: RefCell::new(None),
        }))
    }

    pub fn form(&self) -> &H::Node {
        &self.form
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    pub fn draft(&self) -> ContactDraft {
        let read = |node: Option<&H::Node>| node.map(|n| self.host.value(n)).unwrap_or_default();

        ContactDraft::new(
            &read(Some(&self.fields.name)),
            &read(Some(&self.fields.email)),
            &read(self.fields.subject.as_ref()),
            &read(self.fields.budget.as_ref()),
            &read(Some(&self.fields.message)),
        )
    }

    // the browser never gets to navigate; everything past validation is simulated
    pub fn on_submit(self: &Rc<Self>) -> EventFlow {
        if self.in_flight.get() {
            debug!("submission already in flight, ignoring");
            return EventFlow::PreventDefault;
        }

        let draft = self.draft();
        if let Err(err) = validate(&draft) {
            debug!(field = ?err.field(), "contact form rejected: {err}");
            self.notifier
                .present(err.message(&self.config), NotificationKind::Failure);
            return EventFlow::PreventDefault;
        }

        self.begin();

        let form = self.clone();
        self.host.set_timeout(
            self.config.latency(),
            Box::new(move || form.complete(draft)),
        );

        EventFlow::PreventDefault
    }

    fn begin(&self) {
        self.in_flight.set(true);
        if let Some(submit) = &self.submit {
            *self.saved_label.borrow_mut() = Some(self.host.markup(submit));
            self.host.set_markup(submit, &self.config.pending_label);
            self.host.set_disabled(submit, true);
        }
    }

    fn complete(&self, draft: ContactDraft) {
        self.notifier
            .present(&self.config.success_message, NotificationKind::Success);
        self.host.reset_form(&self.form);

        if let Some(submit) = &self.submit {
            if let Some(label) = self.saved_label.borrow_mut().take() {
                self.host.set_markup(submit, &label);
            }
            self.host.set_disabled(submit, false);
        }
        self.in_flight.set(false);

        self.sink.deliver(&draft);
    }
}
