use glc_client::error::Result;
use glc_client::views::CardList;

use super::Outcome;
use crate::context::Context;
use crate::output;

pub async fn list(ctx: &Context) -> Result<Outcome> {
    let customers = ctx.client.list_customers().await?;
    output::show(&CardList::customers(&customers));
    Ok(Outcome::Shown)
}
