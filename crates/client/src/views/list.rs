//! Card lists with inline actions.

use core::fmt;

use chrono::NaiveDateTime;
use glc_core::{
    Customer, Review, ReviewId, Reviewer, Service, ServiceId, Subscription, SubscriptionId,
};
use thiserror::Error;
use tracing::{info, instrument};

use super::{Action, Field};
use crate::api::ResourceClient;
use crate::error::ClientError;
use crate::image::{ImageSource, forget_service_image};
use crate::store::{KeyValueStore, StoreError};

/// Errors from card actions.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("No card with id {0} offers that action")]
    UnknownCard(i64),

    #[error("Review {0} has no open reply form")]
    ReplyNotOpen(i64),

    #[error("Review {0} already has a reply")]
    AlreadyReplied(i64),

    #[error("Reply text is empty")]
    EmptyReply,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Provider reply state of a review card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyState {
    /// Not a review card, or the viewer cannot reply.
    Unavailable,
    /// The `Reply` button is shown.
    Available,
    /// The reply form is showing.
    Open,
    /// Final; cannot be reopened.
    Replied(String),
}

/// One entity in a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: i64,
    pub title: String,
    pub fields: Vec<Field>,
    pub actions: Vec<Action>,
    pub reply: ReplyState,
}

impl Card {
    fn new(id: i64, title: String, fields: Vec<Field>, actions: Vec<Action>) -> Self {
        Self {
            id,
            title,
            fields,
            actions,
            reply: ReplyState::Unavailable,
        }
    }

    /// Value shown for `label`, if the card has that row.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

/// A rendered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardList {
    heading: &'static str,
    empty_message: &'static str,
    cards: Vec<Card>,
}

fn price_text(service: &Service) -> String {
    service.price.map(|p| p.to_string()).unwrap_or_default()
}

fn date_text(date: Option<NaiveDateTime>) -> Option<String> {
    date.map(|d| d.format("%m/%d/%Y").to_string())
}

impl CardList {
    /// A provider's services, with their image source and `Delete`.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cache cannot be read.
    pub fn provider_services(
        services: &[Service],
        images: &impl KeyValueStore,
    ) -> Result<Self, StoreError> {
        let cards = services
            .iter()
            .map(|s| {
                let image = ImageSource::resolve(images, s)?;
                Ok(Card::new(
                    s.id.as_i64(),
                    format!("Service #{}", s.id),
                    vec![
                        Field::new("Name", &s.name),
                        Field::optional("Description", s.description.as_deref()),
                        Field::new("Price", price_text(s)),
                        Field::new("Image", image.label()),
                    ],
                    vec![Action::Delete],
                ))
            })
            .collect::<Result<_, StoreError>>()?;
        Ok(Self {
            heading: "Your Services",
            empty_message: "No services yet.",
            cards,
        })
    }

    /// Services a customer can pick from.
    #[must_use]
    pub fn customer_services(services: &[Service]) -> Self {
        let cards = services
            .iter()
            .map(|s| {
                Card::new(
                    s.id.as_i64(),
                    format!("Service #{}", s.id),
                    vec![
                        Field::new("Name", &s.name),
                        Field::optional("Description", s.description.as_deref()),
                        Field::new("Price", price_text(s)),
                    ],
                    vec![Action::Select],
                )
            })
            .collect();
        Self {
            heading: "Services",
            empty_message: "No services available.",
            cards,
        }
    }

    /// A customer's subscriptions, each with `Cancel`.
    #[must_use]
    pub fn subscriptions(subscriptions: &[Subscription]) -> Self {
        let cards = subscriptions
            .iter()
            .map(|sub| {
                let service = sub.services.as_ref();
                let mut fields = vec![
                    Field::new(
                        "Service",
                        service.map_or("Service", |s| s.name.as_str()),
                    ),
                    Field::new("Type", sub.kind.label()),
                ];
                if let Some(desc) = service.and_then(|s| s.description.as_deref())
                    && !desc.is_empty()
                {
                    fields.push(Field::new("Description", desc));
                }
                if let Some(price) = service.and_then(|s| s.price) {
                    fields.push(Field::new("Price", price.to_string()));
                }
                Card::new(
                    sub.id.as_i64(),
                    format!("Subscription #{}", sub.id),
                    fields,
                    vec![Action::Cancel],
                )
            })
            .collect();
        Self {
            heading: "Active Subscriptions",
            empty_message: "No active subscriptions",
            cards,
        }
    }

    /// Reviews; `can_reply` offers `Reply` on those without a response.
    #[must_use]
    pub fn reviews(reviews: &[Review], can_reply: bool) -> Self {
        let cards = reviews
            .iter()
            .map(|r| {
                let reviewer = r
                    .customer
                    .as_ref()
                    .map_or_else(|| "Anonymous".to_string(), Reviewer::display_name);
                let mut fields = vec![
                    Field::new("Reviewer", reviewer),
                    Field::new("Rating", "⭐".repeat(r.stars())),
                ];
                if let Some(service) = r.services.as_ref().filter(|s| !s.name.is_empty()) {
                    fields.push(Field::new("Service", &service.name));
                }
                if let Some(date) = date_text(r.created_at) {
                    fields.push(Field::new("Date Created", date));
                }
                fields.push(Field::optional("Comment", r.comment.as_deref()));

                let mut card = Card::new(
                    r.id.as_i64(),
                    format!("Review #{}", r.id),
                    fields,
                    Vec::new(),
                );
                match r.provider_response.as_deref().filter(|t| !t.is_empty()) {
                    Some(text) => card.reply = ReplyState::Replied(text.to_string()),
                    None if can_reply => {
                        card.reply = ReplyState::Available;
                        card.actions.push(Action::Reply);
                    }
                    None => {}
                }
                card
            })
            .collect();
        Self {
            heading: "Reviews",
            empty_message: "No reviews yet.",
            cards,
        }
    }

    /// Customers as seen by a provider.
    #[must_use]
    pub fn customers(customers: &[Customer]) -> Self {
        let cards = customers
            .iter()
            .map(|c| {
                Card::new(
                    c.id.as_i64(),
                    format!("Customer #{}", c.id),
                    vec![
                        Field::new("Name", &c.name),
                        Field::new("Email", &c.email),
                        Field::optional("Phone Number", c.phone_number.as_deref()),
                        Field::optional("Address", c.address.as_deref()),
                    ],
                    Vec::new(),
                )
            })
            .collect();
        Self {
            heading: "Customers",
            empty_message: "No customers found.",
            cards,
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, id: i64) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Position of card `id`, which must offer `action`.
    fn position(&self, id: i64, action: Action) -> Result<usize, ListError> {
        self.cards
            .iter()
            .position(|c| c.id == id && c.actions.contains(&action))
            .ok_or(ListError::UnknownCard(id))
    }

    fn review_card(&mut self, id: ReviewId) -> Result<&mut Card, ListError> {
        self.cards
            .iter_mut()
            .find(|c| c.id == id.as_i64() && c.reply != ReplyState::Unavailable)
            .ok_or(ListError::UnknownCard(id.as_i64()))
    }

    /// Delete a service and its card, and forget its cached image.
    ///
    /// # Errors
    ///
    /// Returns an error if the card is not here, the request fails, or the
    /// image cache cannot be written. The card stays when the request fails.
    #[instrument(skip(self, client, images))]
    pub async fn delete_service(
        &mut self,
        client: &ResourceClient,
        images: &mut impl KeyValueStore,
        id: ServiceId,
    ) -> Result<(), ListError> {
        let pos = self.position(id.as_i64(), Action::Delete)?;
        client.delete_service(id).await?;
        self.cards.remove(pos);
        forget_service_image(images, id)?;
        info!(%id, "Service deleted");
        Ok(())
    }

    /// Cancel a subscription and drop its card.
    ///
    /// # Errors
    ///
    /// Returns an error if the card is not here or the request fails.
    #[instrument(skip(self, client))]
    pub async fn cancel_subscription(
        &mut self,
        client: &ResourceClient,
        id: SubscriptionId,
    ) -> Result<(), ListError> {
        let pos = self.position(id.as_i64(), Action::Cancel)?;
        client.cancel_subscription(id).await?;
        self.cards.remove(pos);
        info!(%id, "Subscription cancelled");
        Ok(())
    }

    /// Show the reply form; opening it twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the review is not here or already has a reply.
    pub fn open_reply(&mut self, id: ReviewId) -> Result<(), ListError> {
        let card = self.review_card(id)?;
        match card.reply {
            ReplyState::Available => {
                card.reply = ReplyState::Open;
                Ok(())
            }
            ReplyState::Open => Ok(()),
            ReplyState::Replied(_) => Err(ListError::AlreadyReplied(id.as_i64())),
            ReplyState::Unavailable => Err(ListError::UnknownCard(id.as_i64())),
        }
    }

    /// Close an open reply form without sending.
    ///
    /// # Errors
    ///
    /// Returns an error if the review is not here.
    pub fn cancel_reply(&mut self, id: ReviewId) -> Result<(), ListError> {
        let card = self.review_card(id)?;
        if card.reply == ReplyState::Open {
            card.reply = ReplyState::Available;
        }
        Ok(())
    }

    /// Send the reply typed into an open form.
    ///
    /// On success the form becomes the final reply text. On failure the form
    /// stays open so the reply can be retried.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is not open, the text is blank, or the
    /// request fails.
    #[instrument(skip(self, client, text))]
    pub async fn submit_reply(
        &mut self,
        client: &ResourceClient,
        id: ReviewId,
        text: &str,
    ) -> Result<(), ListError> {
        let card = self.review_card(id)?;
        match card.reply {
            ReplyState::Open => {}
            ReplyState::Replied(_) => return Err(ListError::AlreadyReplied(id.as_i64())),
            _ => return Err(ListError::ReplyNotOpen(id.as_i64())),
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ListError::EmptyReply);
        }

        client.reply_to_review(id, text).await?;

        card.reply = ReplyState::Replied(text.to_string());
        card.actions.retain(|a| *a != Action::Reply);
        info!(%id, "Reply posted");
        Ok(())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}", self.title)?;
        for field in &self.fields {
            write!(f, "\n    {field}")?;
        }
        match &self.reply {
            ReplyState::Replied(text) => write!(f, "\n    Provider reply: {text}")?,
            ReplyState::Open => write!(f, "\n    (reply form open)")?,
            ReplyState::Available | ReplyState::Unavailable => {}
        }
        if !self.actions.is_empty() {
            let actions: Vec<String> = self.actions.iter().map(|a| format!("[{a}]")).collect();
            write!(f, "\n    {}", actions.join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Display for CardList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.heading)?;
        if self.cards.is_empty() {
            return write!(f, "\n  {}", self.empty_message);
        }
        for card in &self.cards {
            write!(f, "\n{card}")?;
        }
        Ok(())
    }
}
