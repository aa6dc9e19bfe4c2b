//! View models.
//!
//! Each page region is modelled as plain data (rows, cards, actions) built
//! from backend records, plus a `Display` impl that renders it as text. A
//! region is rebuilt wholesale from fresh data; card actions mutate only the
//! card they target.

mod list;
mod notice;
mod profile;

pub use list::{Card, CardList, ListError, ReplyState};
pub use notice::{Notice, NoticeLevel};
pub use profile::{ProfileFields, ProfilePanel, ProfileView, render_profile};

use core::fmt;

/// A labelled value row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    /// Shown as-is; a missing value is the empty string.
    pub value: String,
}

impl Field {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }

    /// Row for an optional value.
    #[must_use]
    pub fn optional(label: &'static str, value: Option<&str>) -> Self {
        Self::new(label, value.unwrap_or_default())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Buttons a view offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Back,
    Edit,
    Delete,
    Cancel,
    Reply,
    Select,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Back => "Back to Home",
            Self::Edit => "Edit Profile",
            Self::Delete => "Delete",
            Self::Cancel => "Cancel Subscription",
            Self::Reply => "Reply",
            Self::Select => "Select",
        })
    }
}
