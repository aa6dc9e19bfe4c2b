//! Cart and checkout.

use chrono::Local;
use glc_client::{ActionError, LocalCart};
use glc_client::error::Result;
use glc_client::flows;
use glc_client::views::Notice;
use glc_core::{ServiceId, SubscriptionType};

use super::Outcome;
use crate::context::Context;
use crate::output;

pub async fn add(ctx: &mut Context, service: ServiceId, kind: SubscriptionType) -> Result<Outcome> {
    let item =
        flows::select_service(&ctx.client, &mut ctx.store, &ctx.session, service, kind).await?;
    Ok(Outcome::Notice(Notice::success(format!(
        "Added to cart: {} ({}) - {}",
        item.service_name,
        kind.label(),
        item.display_price()
    ))))
}

pub fn show(ctx: &mut Context) -> Result<Outcome> {
    let cart = LocalCart::new(&mut ctx.store);
    let lines = cart.lines()?;
    if lines.is_empty() {
        return Ok(Outcome::Notice(Notice::info("Your cart is empty")));
    }
    for line in &lines {
        output::show(line);
    }
    output::show(&format_args!("Total: {}", cart.total()?));
    Ok(Outcome::Shown)
}

pub fn remove(ctx: &mut Context, index: usize) -> Result<Outcome> {
    let mut cart = LocalCart::new(&mut ctx.store);
    let removed = cart.remove(index)?;
    Ok(Outcome::Notice(Notice::success(format!(
        "Removed {} from your cart. New total: {}",
        removed.service_name,
        cart.total()?
    ))))
}

pub async fn checkout(ctx: &mut Context) -> Result<Outcome> {
    let now = Local::now().naive_local();
    let report = flows::checkout(&ctx.client, &mut ctx.store, &ctx.session, now).await?;

    let Some(failure) = report.failure else {
        return Ok(Outcome::Notice(Notice::success(format!(
            "Thank you for your order! {} subscription(s) created.",
            report.submitted.len()
        ))));
    };

    let reason = Notice::failure("checkout", &ActionError::from(failure.error));
    let mut message = format!(
        "{} (item {}: {}).",
        reason.message,
        failure.index,
        failure.item.service_name
    );
    if !report.submitted.is_empty() {
        message.push_str(&format!(
            " {} earlier item(s) were already subscribed and are still in your cart.",
            report.submitted.len()
        ));
    }
    Ok(Outcome::Notice(Notice::error(message)))
}
