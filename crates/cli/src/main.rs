//! Greensboro Lawn Care CLI.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and sign in as it
//! glc signup --name "Jo Green" --email jo@example.com --password hunter22 --address "1 Elm St"
//!
//! # Browse and buy
//! glc services list
//! glc cart add 4 --type weekly
//! glc cart checkout
//!
//! # Provider side
//! glc session login-provider 1
//! glc reviews provider
//! glc reviews reply 12 "Thanks for the kind words!"
//! ```
//!
//! # Commands
//!
//! - `session` - Sign in, sign out, store a bearer token
//! - `signup` - Create a customer account
//! - `profile` / `provider` - Show or edit profiles
//! - `services` - Browse, add and delete services
//! - `cart` - Pending purchases and checkout
//! - `subscriptions` - List and cancel subscriptions
//! - `reviews` - Read, write and reply to reviews
//! - `customers` - Customer list for providers
//!
//! Configuration comes from the environment; see [`glc_client::config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use glc_client::views::Notice;
use glc_client::{ClientConfig, ClientError, ConfigError, StoreError};
use glc_core::{CustomerId, ProviderId, ReviewId, ServiceId, SubscriptionId, SubscriptionType};
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod context;
mod output;

use commands::Outcome;
use context::Context;

#[derive(Parser)]
#[command(name = "glc")]
#[command(author, version, about = "Greensboro Lawn Care command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and out
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Create a customer account and sign in as it
    Signup {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        address: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Customer profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Provider profile
    Provider {
        #[command(subcommand)]
        action: ProviderAction,
    },
    /// Services
    Services {
        #[command(subcommand)]
        action: ServicesAction,
    },
    /// Pending purchases
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// The signed-in customer's subscriptions
    Subscriptions {
        #[command(subcommand)]
        action: SubscriptionsAction,
    },
    /// Reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewsAction,
    },
    /// List every customer
    Customers,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Act as an existing customer
    LoginCustomer { id: CustomerId },
    /// Act as an existing provider
    LoginProvider { id: ProviderId },
    /// Forget the signed-in identity and token
    Logout,
    /// Store a bearer token sent with every request
    Token { token: String },
    /// Show who is signed in
    Show,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show a customer profile (default: your own)
    Show {
        #[arg(long)]
        id: Option<CustomerId>,
    },
    /// Edit your profile; blank optional fields are left unchanged
    Edit {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        card_number: String,
        #[arg(long, default_value = "")]
        password: String,
    },
}

#[derive(Subcommand)]
enum ProviderAction {
    /// Show a provider profile (default: your own)
    Show {
        #[arg(long)]
        id: Option<ProviderId>,
    },
    /// Edit your provider profile
    Edit {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        password: String,
    },
}

#[derive(Subcommand)]
enum ServicesAction {
    /// Services currently offered
    List,
    /// Every service, as managed by the provider
    All,
    /// One service with its subscription option prices
    Show { id: ServiceId },
    /// Add a service
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        price: String,
        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Replace a service's details
    Edit {
        id: ServiceId,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        price: String,
        /// New image file; the current one is kept otherwise
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a service
    Delete { id: ServiceId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a service to the cart
    Add {
        service: ServiceId,
        /// `one-time`, `weekly` or `bi-weekly`
        #[arg(short = 't', long = "type", default_value = "one-time")]
        kind: SubscriptionType,
    },
    /// Show the cart and its total
    Show,
    /// Remove the item at a position
    Remove { index: usize },
    /// Turn every item into a subscription
    Checkout,
}

#[derive(Subcommand)]
enum SubscriptionsAction {
    /// Your active subscriptions
    List,
    /// Cancel a subscription
    Cancel { id: SubscriptionId },
}

#[derive(Subcommand)]
enum ReviewsAction {
    /// Reviews of a service
    Service { id: ServiceId },
    /// Reviews of a provider's services (default: your own)
    Provider {
        #[arg(long)]
        id: Option<ProviderId>,
    },
    /// Review a service as the signed-in customer
    Submit {
        #[arg(short, long)]
        service: ServiceId,
        /// 1 to 5
        #[arg(short, long)]
        rating: u8,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Reply to a review as the signed-in provider
    Reply { id: ReviewId, text: String },
}

impl Commands {
    /// Noun used in failure messages.
    const fn action_name(&self) -> &'static str {
        match self {
            Self::Session { .. } => "session update",
            Self::Signup { .. } => "signup",
            Self::Profile {
                action: ProfileAction::Edit { .. },
            }
            | Self::Provider {
                action: ProviderAction::Edit { .. },
            } => "update",
            Self::Services {
                action: ServicesAction::Add { .. },
            } => "add service",
            Self::Services {
                action: ServicesAction::Edit { .. },
            } => "update service",
            Self::Services {
                action: ServicesAction::Delete { .. },
            } => "delete",
            Self::Cart {
                action: CartAction::Checkout,
            } => "checkout",
            Self::Cart { .. } => "cart update",
            Self::Subscriptions {
                action: SubscriptionsAction::Cancel { .. },
            } => "cancel",
            Self::Reviews {
                action: ReviewsAction::Submit { .. },
            } => "review",
            Self::Reviews {
                action: ReviewsAction::Reply { .. },
            } => "reply",
            _ => "load",
        }
    }
}

/// Errors that stop the CLI before any command runs.
#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not open local state: {0}")]
    Store(#[from] StoreError),

    #[error("could not create HTTP client: {0}")]
    Client(#[from] ClientError),
}

fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Errors become Sentry events; everything else is a breadcrumb at most.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::startup_failure(&StartupError::from(e));
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "glc_cli=info,glc_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();
    let action = cli.command.action_name();

    let mut ctx = match Context::open(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            output::startup_failure(&e);
            return ExitCode::FAILURE;
        }
    };

    match run(&mut ctx, cli.command).await {
        Ok(Outcome::Shown) => ExitCode::SUCCESS,
        Ok(Outcome::Failed) => ExitCode::FAILURE,
        Ok(Outcome::Notice(notice)) => {
            output::notice(&notice);
            if notice.level == glc_client::views::NoticeLevel::Error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::debug!(action, error = ?e, "Command failed");
            output::notice(&Notice::failure(action, &e));
            ExitCode::FAILURE
        }
    }
}

async fn run(ctx: &mut Context, command: Commands) -> glc_client::error::Result<Outcome> {
    match command {
        Commands::Session { action } => match action {
            SessionAction::LoginCustomer { id } => commands::session::login_customer(ctx, id),
            SessionAction::LoginProvider { id } => commands::session::login_provider(ctx, id),
            SessionAction::Logout => commands::session::logout(ctx),
            SessionAction::Token { token } => commands::session::set_token(ctx, token),
            SessionAction::Show => commands::session::show(ctx),
        },
        Commands::Signup {
            name,
            email,
            password,
            address,
            phone,
        } => {
            let form = glc_client::flows::SignupForm {
                name,
                email,
                password,
                address,
                phone_number: phone,
            };
            commands::account::signup(ctx, &form).await
        }
        Commands::Profile { action } => match action {
            ProfileAction::Show { id } => Ok(commands::account::show_customer(ctx, id).await),
            ProfileAction::Edit {
                name,
                email,
                phone,
                address,
                card_number,
                password,
            } => {
                let form = glc_client::flows::EditCustomerForm {
                    name,
                    email,
                    phone_number: phone,
                    address,
                    card_number,
                    password,
                };
                commands::account::edit_customer(ctx, &form).await
            }
        },
        Commands::Provider { action } => match action {
            ProviderAction::Show { id } => Ok(commands::account::show_provider(ctx, id).await),
            ProviderAction::Edit {
                name,
                email,
                phone,
                password,
            } => {
                let form = glc_client::flows::EditProviderForm {
                    name,
                    email,
                    phone_number: phone,
                    password,
                };
                commands::account::edit_provider(ctx, &form).await
            }
        },
        Commands::Services { action } => match action {
            ServicesAction::List => commands::services::list(ctx).await,
            ServicesAction::All => commands::services::all(ctx).await,
            ServicesAction::Show { id } => commands::services::show(ctx, id).await,
            ServicesAction::Add {
                name,
                description,
                price,
                image,
            } => {
                let form = glc_client::flows::ServiceForm {
                    name,
                    description,
                    price,
                    image,
                };
                commands::services::add(ctx, &form).await
            }
            ServicesAction::Edit {
                id,
                name,
                description,
                price,
                image,
            } => {
                let form = glc_client::flows::ServiceForm {
                    name,
                    description,
                    price,
                    image,
                };
                commands::services::edit(ctx, id, &form).await
            }
            ServicesAction::Delete { id } => commands::services::delete(ctx, id).await,
        },
        Commands::Cart { action } => match action {
            CartAction::Add { service, kind } => commands::cart::add(ctx, service, kind).await,
            CartAction::Show => commands::cart::show(ctx),
            CartAction::Remove { index } => commands::cart::remove(ctx, index),
            CartAction::Checkout => commands::cart::checkout(ctx).await,
        },
        Commands::Subscriptions { action } => match action {
            SubscriptionsAction::List => commands::subscriptions::list(ctx).await,
            SubscriptionsAction::Cancel { id } => commands::subscriptions::cancel(ctx, id).await,
        },
        Commands::Reviews { action } => match action {
            ReviewsAction::Service { id } => commands::reviews::for_service(ctx, id).await,
            ReviewsAction::Provider { id } => commands::reviews::for_provider(ctx, id).await,
            ReviewsAction::Submit {
                service,
                rating,
                comment,
            } => {
                let form = glc_client::flows::ReviewForm {
                    service: Some(service),
                    rating: Some(rating),
                    comment,
                };
                commands::reviews::submit(ctx, &form).await
            }
            ReviewsAction::Reply { id, text } => commands::reviews::reply(ctx, id, &text).await,
        },
        Commands::Customers => commands::customers::list(ctx).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cart_add_parses_kind() {
        let cli = Cli::try_parse_from(["glc", "cart", "add", "4", "--type", "bi-weekly"]).unwrap();
        match cli.command {
            Commands::Cart {
                action: CartAction::Add { service, kind },
            } => {
                assert_eq!(service, ServiceId::new(4));
                assert_eq!(kind, SubscriptionType::Biweekly);
            }
            _ => panic!("expected cart add"),
        }
    }

    #[test]
    fn test_action_names() {
        let cli = Cli::try_parse_from(["glc", "cart", "checkout"]).unwrap();
        assert_eq!(cli.command.action_name(), "checkout");
        let cli = Cli::try_parse_from(["glc", "services", "list"]).unwrap();
        assert_eq!(cli.command.action_name(), "load");
        let cli = Cli::try_parse_from([
            "glc", "services", "edit", "3", "-n", "Mowing", "-d", "Front", "-p", "40",
        ])
        .unwrap();
        assert_eq!(cli.command.action_name(), "update service");
    }
}
