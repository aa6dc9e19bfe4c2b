//! Reviews and provider replies.

use glc_client::ValidationError;
use glc_client::error::Result;
use glc_client::flows::{self, ReviewForm};
use glc_client::views::{CardList, Notice};
use glc_core::{ProviderId, ReviewId, ServiceId};

use super::Outcome;
use crate::context::Context;
use crate::output;

pub async fn for_service(ctx: &Context, id: ServiceId) -> Result<Outcome> {
    let reviews = ctx.client.list_service_reviews(id).await?;
    output::show(&CardList::reviews(&reviews, false));
    Ok(Outcome::Shown)
}

fn provider(ctx: &Context, id: Option<ProviderId>) -> Result<ProviderId> {
    Ok(id
        .or_else(|| ctx.session.provider_id())
        .ok_or(ValidationError::NotSignedIn("provider"))?)
}

pub async fn for_provider(ctx: &Context, id: Option<ProviderId>) -> Result<Outcome> {
    let id = provider(ctx, id)?;
    let reviews = ctx.client.list_provider_reviews(id).await?;
    output::show(&CardList::reviews(&reviews, ctx.session.owns_provider(id)));
    Ok(Outcome::Shown)
}

pub async fn submit(ctx: &Context, form: &ReviewForm) -> Result<Outcome> {
    flows::submit_review(&ctx.client, &ctx.session, form).await?;
    Ok(Outcome::Notice(Notice::success("Review submitted successfully.")))
}

/// Reply to one of the signed-in provider's reviews.
pub async fn reply(ctx: &Context, id: ReviewId, text: &str) -> Result<Outcome> {
    let provider = provider(ctx, None)?;
    let reviews = ctx.client.list_provider_reviews(provider).await?;
    let mut list = CardList::reviews(&reviews, true);
    list.open_reply(id)?;
    list.submit_reply(&ctx.client, id, text).await?;
    if let Some(card) = list.card(id.as_i64()) {
        output::show(card);
    }
    Ok(Outcome::Notice(Notice::success("Reply posted.")))
}
