//! Subscriptions.

use glc_client::ValidationError;
use glc_client::error::Result;
use glc_client::views::{CardList, Notice};
use glc_core::{CustomerId, SubscriptionId};

use super::Outcome;
use crate::context::Context;
use crate::output;

fn customer(ctx: &Context) -> Result<CustomerId> {
    Ok(ctx
        .session
        .customer_id()
        .ok_or(ValidationError::NotSignedIn("customer"))?)
}

pub async fn list(ctx: &Context) -> Result<Outcome> {
    let subs = ctx
        .client
        .list_customer_subscriptions(customer(ctx)?)
        .await?;
    output::show(&CardList::subscriptions(&subs));
    Ok(Outcome::Shown)
}

pub async fn cancel(ctx: &Context, id: SubscriptionId) -> Result<Outcome> {
    let subs = ctx
        .client
        .list_customer_subscriptions(customer(ctx)?)
        .await?;
    let mut list = CardList::subscriptions(&subs);
    list.cancel_subscription(&ctx.client, id).await?;
    output::show(&list);
    Ok(Outcome::Notice(Notice::success(format!(
        "Subscription {id} cancelled."
    ))))
}
