//! Signup and profiles.

use glc_client::error::Result;
use glc_client::flows::{self, EditCustomerForm, EditProviderForm, SignupForm};
use glc_client::views::{Notice, ProfilePanel};
use glc_core::{CustomerId, ProviderId};

use super::Outcome;
use crate::context::Context;
use crate::output;

pub async fn signup(ctx: &mut Context, form: &SignupForm) -> Result<Outcome> {
    let id = flows::signup(&ctx.client, &mut ctx.store, &mut ctx.session, form).await?;
    Ok(Outcome::Notice(Notice::success(format!(
        "Account created. You are signed in as customer {id}."
    ))))
}

fn shown(panel: &ProfilePanel) -> Outcome {
    output::show(panel);
    match panel {
        ProfilePanel::Loaded(_) => Outcome::Shown,
        ProfilePanel::SignedOut | ProfilePanel::Error(_) => Outcome::Failed,
    }
}

pub async fn show_customer(ctx: &Context, id: Option<CustomerId>) -> Outcome {
    shown(&flows::customer_profile(&ctx.client, &ctx.session, id).await)
}

pub async fn show_provider(ctx: &Context, id: Option<ProviderId>) -> Outcome {
    shown(&flows::provider_profile(&ctx.client, &ctx.session, id).await)
}

pub async fn edit_customer(ctx: &Context, form: &EditCustomerForm) -> Result<Outcome> {
    flows::edit_customer(&ctx.client, &ctx.session, form).await?;
    Ok(Outcome::Notice(Notice::success("Profile updated successfully!")))
}

pub async fn edit_provider(ctx: &Context, form: &EditProviderForm) -> Result<Outcome> {
    flows::edit_provider(&ctx.client, &ctx.session, form).await?;
    Ok(Outcome::Notice(Notice::success("Profile updated successfully!")))
}
