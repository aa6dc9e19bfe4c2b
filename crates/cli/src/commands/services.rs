//! Services.

use glc_client::error::Result;
use glc_client::flows::{self, ServiceForm};
use glc_client::views::{CardList, Notice, render_profile};
use glc_core::{Price, ServiceId};

use super::Outcome;
use crate::context::Context;
use crate::output;

pub async fn list(ctx: &Context) -> Result<Outcome> {
    let services = ctx.client.list_services().await?;
    output::show(&CardList::customer_services(&services));
    Ok(Outcome::Shown)
}

pub async fn all(ctx: &Context) -> Result<Outcome> {
    let services = ctx.client.list_all_services().await?;
    output::show(&CardList::provider_services(&services, &ctx.store)?);
    Ok(Outcome::Shown)
}

pub async fn show(ctx: &Context, id: ServiceId) -> Result<Outcome> {
    let service = ctx.client.get_service(id).await?;
    output::show(&render_profile(&service, false));
    if let Some(base) = service.price.filter(|p| *p > Price::ZERO) {
        for (kind, price) in flows::option_prices(base) {
            output::show(&format_args!("  {}: {price}", kind.label()));
        }
    }
    Ok(Outcome::Shown)
}

pub async fn add(ctx: &mut Context, form: &ServiceForm) -> Result<Outcome> {
    let created = flows::add_service(&ctx.client, &mut ctx.store, form).await?;
    Ok(Outcome::Notice(Notice::success(format!(
        "Service added successfully (id {}).",
        created.id
    ))))
}

pub async fn edit(ctx: &mut Context, id: ServiceId, form: &ServiceForm) -> Result<Outcome> {
    let updated = flows::edit_service(&ctx.client, &mut ctx.store, id, form).await?;
    Ok(Outcome::Notice(Notice::success(format!(
        "Service {} updated.",
        updated.id
    ))))
}

pub async fn delete(ctx: &mut Context, id: ServiceId) -> Result<Outcome> {
    let services = ctx.client.list_all_services().await?;
    let mut list = CardList::provider_services(&services, &ctx.store)?;
    list.delete_service(&ctx.client, &mut ctx.store, id).await?;
    output::show(&list);
    Ok(Outcome::Notice(Notice::success(format!("Service {id} deleted."))))
}
