//! Sign-in state.

use glc_client::error::Result;
use glc_client::views::Notice;
use glc_client::{Identity, KeyValueStore};
use glc_core::{CustomerId, ProviderId};
use secrecy::SecretString;

use super::Outcome;
use crate::context::Context;

pub fn login_customer(ctx: &mut Context, id: CustomerId) -> Result<Outcome> {
    ctx.session
        .sign_in(&mut ctx.store, Identity::Customer(id))?;
    Ok(Outcome::Notice(Notice::success(format!(
        "Signed in as customer {id}."
    ))))
}

pub fn login_provider(ctx: &mut Context, id: ProviderId) -> Result<Outcome> {
    ctx.session
        .sign_in(&mut ctx.store, Identity::Provider(id))?;
    Ok(Outcome::Notice(Notice::success(format!(
        "Signed in as provider {id}."
    ))))
}

pub fn logout(ctx: &mut Context) -> Result<Outcome> {
    ctx.session.sign_out(&mut ctx.store)?;
    Ok(Outcome::Notice(Notice::success("Signed out.")))
}

pub fn set_token(ctx: &mut Context, token: String) -> Result<Outcome> {
    ctx.session
        .set_auth_token(&mut ctx.store, SecretString::from(token))?;
    Ok(Outcome::Notice(Notice::success("Token saved.")))
}

pub fn show(ctx: &Context) -> Result<Outcome> {
    let who = match ctx.session.identity() {
        Some(Identity::Customer(id)) => format!("Signed in as customer {id}"),
        Some(Identity::Provider(id)) => format!("Signed in as provider {id}"),
        None => "Not signed in".to_string(),
    };
    let token = if ctx.session.auth_token().is_some() {
        "token stored"
    } else {
        "no token"
    };
    let cart = if ctx.store.get(glc_client::store::keys::CART)?.is_some() {
        ", cart pending"
    } else {
        ""
    };
    Ok(Outcome::Notice(Notice::info(format!(
        "{who} ({token}{cart})"
    ))))
}
