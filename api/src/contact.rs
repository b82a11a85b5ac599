use serde::{Deserialize, Serialize};

// the record collected from the contact form at submit time
//
// everything but the budget is trimmed when it is read off the page; the budget comes from a
// select element and is taken verbatim.  trimming also strips the byte order mark, which browser
// trim() treats as whitespace
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub budget: String,
    pub message: String,
}

impl ContactDraft {
    pub fn new(name: &str, email: &str, subject: &str, budget: &str, message: &str) -> Self {
        ContactDraft {
            name: trim(name),
            email: trim(email),
            subject: trim(subject),
            budget: budget.to_owned(),
            message: trim(message),
        }
    }

    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Subject => &self.subject,
            ContactField::Budget => &self.budget,
            ContactField::Message => &self.message,
        }
    }

    pub fn has_required(&self) -> bool {
        ContactField::all()
            .into_iter()
            .filter(|field| field.required())
            .all(|field| !self.get(field).is_empty())
    }
}

const BYTE_ORDER_MARK: char = '\u{FEFF}';

fn trim(value: &str) -> String {
    value
        .trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
        .to_owned()
}

// the form fields, keyed by their element ids
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Budget,
    Message,
}

impl ContactField {
    pub fn all() -> [Self; 5] {
        [
            Self::Name,
            Self::Email,
            Self::Subject,
            Self::Budget,
            Self::Message,
        ]
    }

    pub fn required(self) -> bool {
        matches!(self, Self::Name | Self::Email | Self::Message)
    }
}
