//! Read-only profile views.

use core::fmt;

use glc_core::{Customer, Provider, Service};

use super::{Action, Field};
use crate::error::ClientError;

/// Entities that have a profile page.
pub trait ProfileFields {
    /// Heading of the profile panel.
    const TITLE: &'static str;

    /// Rows in display order. Missing values are empty strings.
    fn profile_fields(&self) -> Vec<Field>;
}

impl ProfileFields for Customer {
    const TITLE: &'static str = "Profile";

    fn profile_fields(&self) -> Vec<Field> {
        let payment = self.card_number.map_or_else(
            || "None".to_string(),
            |card| format!("card ending {}", card.last_four()),
        );
        vec![
            Field::new("Name", &self.name),
            Field::new("Email", &self.email),
            Field::optional("Phone Number", self.phone_number.as_deref()),
            Field::optional("Address", self.address.as_deref()),
            Field::new("Payment Method", payment),
        ]
    }
}

impl ProfileFields for Provider {
    const TITLE: &'static str = "Provider Profile";

    fn profile_fields(&self) -> Vec<Field> {
        vec![
            Field::new("Name", &self.name),
            Field::new("Email", &self.email),
            Field::optional("Phone Number", self.phone_number.as_deref()),
        ]
    }
}

impl ProfileFields for Service {
    const TITLE: &'static str = "Service";

    fn profile_fields(&self) -> Vec<Field> {
        vec![
            Field::new("Name", &self.name),
            Field::optional("Description", self.description.as_deref()),
            Field::new(
                "Price",
                self.price.map(|p| p.to_string()).unwrap_or_default(),
            ),
            Field::new("Available", if self.available { "Yes" } else { "No" }),
        ]
    }
}

/// A rendered profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub title: &'static str,
    pub fields: Vec<Field>,
    pub actions: Vec<Action>,
}

impl ProfileView {
    /// Value shown for `label`, if the profile has that row.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

/// Render `entity`; `Edit` is offered only to its owner.
#[must_use]
pub fn render_profile<E: ProfileFields>(entity: &E, is_owner: bool) -> ProfileView {
    let mut actions = vec![Action::Back];
    if is_owner {
        actions.push(Action::Edit);
    }
    ProfileView {
        title: E::TITLE,
        fields: entity.profile_fields(),
        actions,
    }
}

/// What the profile area shows after a load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilePanel {
    Loaded(ProfileView),
    /// No id to look up.
    SignedOut,
    /// Load failed; the message is shown in place of the profile.
    Error(String),
}

impl ProfilePanel {
    /// Panel for the outcome of fetching and rendering a profile.
    #[must_use]
    pub fn from_result(result: Result<ProfileView, ClientError>) -> Self {
        match result {
            Ok(view) => Self::Loaded(view),
            Err(ClientError::Http { status, .. }) => {
                Self::Error(format!("Could not load profile ({status})"))
            }
            Err(ClientError::Network(_)) => {
                Self::Error("Network error while loading profile.".to_string())
            }
            Err(other) => Self::Error(other.to_string()),
        }
    }
}

impl fmt::Display for ProfileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for field in &self.fields {
            writeln!(f, "  {field}")?;
        }
        let actions: Vec<String> = self.actions.iter().map(|a| format!("[{a}]")).collect();
        write!(f, "  {}", actions.join(" "))
    }
}

impl fmt::Display for ProfilePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(view) => view.fmt(f),
            Self::SignedOut => write!(
                f,
                "No profile\n  No id found. Please sign up or log in."
            ),
            Self::Error(message) => write!(f, "Error\n  {message}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use glc_core::{CardNumber, CustomerId, Price, ServiceId};

    use super::*;

    fn customer() -> Customer {
        Customer {
            id: CustomerId::new(77),
            name: "Jo Green".to_string(),
            email: "jo@lawn.example".to_string(),
            address: None,
            phone_number: Some("555-0100".to_string()),
            card_number: Some(CardNumber::from_stored(4_111_111_111_111_234)),
        }
    }

    #[test]
    fn test_customer_field_table() {
        let view = render_profile(&customer(), true);
        let labels: Vec<_> = view.fields.iter().map(|f| f.label).collect();
        assert_eq!(
            labels,
            ["Name", "Email", "Phone Number", "Address", "Payment Method"]
        );
        assert_eq!(view.value("Address"), Some(""));
        assert_eq!(view.value("Payment Method"), Some("card ending 1234"));
    }

    #[test]
    fn test_edit_only_for_owner() {
        assert_eq!(
            render_profile(&customer(), true).actions,
            [Action::Back, Action::Edit]
        );
        assert_eq!(render_profile(&customer(), false).actions, [Action::Back]);
    }

    #[test]
    fn test_missing_values_never_print_null() {
        let mut c = customer();
        c.phone_number = None;
        c.card_number = None;
        let text = render_profile(&c, false).to_string();
        assert!(!text.contains("null"));
        assert!(!text.contains("undefined"));
        assert!(text.contains("Phone Number: \n"));
        assert!(text.contains("Payment Method: None"));
    }

    #[test]
    fn test_service_fields() {
        let service = Service {
            id: ServiceId::new(1),
            name: "Mowing".to_string(),
            description: None,
            image_data: None,
            price: Some(Price::from_cents(4500)),
            available: false,
        };
        let view = render_profile(&service, false);
        assert_eq!(view.value("Price"), Some("$45.00"));
        assert_eq!(view.value("Available"), Some("No"));
        assert_eq!(view.value("Description"), Some(""));
    }

    #[test]
    fn test_error_panel_contains_status() {
        let panel = ProfilePanel::from_result(Err(ClientError::Http {
            status: 404,
            body: String::new(),
        }));
        assert_eq!(panel, ProfilePanel::Error("Could not load profile (404)".to_string()));
        assert!(panel.to_string().contains("404"));
    }
}
