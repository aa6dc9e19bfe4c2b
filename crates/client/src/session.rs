//! Session identity.
//!
//! The acting customer or provider is read from the store once and then
//! passed explicitly to whatever needs it. At most one identity is held at a
//! time: signing in as one kind clears the other.

use glc_core::{CustomerId, ProviderId};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::store::{KeyValueStore, StoreError, keys};

/// Who is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Customer(CustomerId),
    Provider(ProviderId),
}

/// The current session, loaded from a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<Identity>,
    auth_token: Option<SecretString>,
}

impl Session {
    /// A signed-out session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Read the session from `store`.
    ///
    /// An id that does not parse is treated as absent and logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(store: &impl KeyValueStore) -> Result<Self, StoreError> {
        let customer = parse_id::<CustomerId>(store, keys::CUSTOMER_ID)?;
        let provider = parse_id::<ProviderId>(store, keys::PROVIDER_ID)?;
        let identity = customer
            .map(Identity::Customer)
            .or_else(|| provider.map(Identity::Provider));
        let auth_token = store
            .get(keys::AUTH_TOKEN)?
            .filter(|t| !t.is_empty())
            .map(SecretString::from);
        Ok(Self {
            identity,
            auth_token,
        })
    }

    /// Current identity, if signed in.
    #[must_use]
    pub const fn identity(&self) -> Option<Identity> {
        self.identity
    }

    /// Current customer id, if a customer is signed in.
    #[must_use]
    pub const fn customer_id(&self) -> Option<CustomerId> {
        match self.identity {
            Some(Identity::Customer(id)) => Some(id),
            _ => None,
        }
    }

    /// Current provider id, if a provider is signed in.
    #[must_use]
    pub const fn provider_id(&self) -> Option<ProviderId> {
        match self.identity {
            Some(Identity::Provider(id)) => Some(id),
            _ => None,
        }
    }

    /// Bearer token, if one is stored.
    #[must_use]
    pub const fn auth_token(&self) -> Option<&SecretString> {
        self.auth_token.as_ref()
    }

    /// Whether the signed-in customer is `id`.
    #[must_use]
    pub fn owns_customer(&self, id: CustomerId) -> bool {
        self.customer_id() == Some(id)
    }

    /// Whether the signed-in provider is `id`.
    #[must_use]
    pub fn owns_provider(&self, id: ProviderId) -> bool {
        self.provider_id() == Some(id)
    }

    /// Become `identity`, replacing whatever was signed in before.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn sign_in(
        &mut self,
        store: &mut impl KeyValueStore,
        identity: Identity,
    ) -> Result<(), StoreError> {
        match identity {
            Identity::Customer(id) => {
                store.remove(keys::PROVIDER_ID)?;
                store.set(keys::CUSTOMER_ID, id.to_string())?;
            }
            Identity::Provider(id) => {
                store.remove(keys::CUSTOMER_ID)?;
                store.set(keys::PROVIDER_ID, id.to_string())?;
            }
        }
        info!(?identity, "Signed in");
        self.identity = Some(identity);
        Ok(())
    }

    /// Store a bearer token for later requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_auth_token(
        &mut self,
        store: &mut impl KeyValueStore,
        token: SecretString,
    ) -> Result<(), StoreError> {
        store.set(keys::AUTH_TOKEN, token.expose_secret().to_string())?;
        self.auth_token = Some(token);
        Ok(())
    }

    /// Forget the identity and token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn sign_out(&mut self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        store.remove(keys::CUSTOMER_ID)?;
        store.remove(keys::PROVIDER_ID)?;
        store.remove(keys::AUTH_TOKEN)?;
        self.identity = None;
        self.auth_token = None;
        info!("Signed out");
        Ok(())
    }
}

fn parse_id<T: std::str::FromStr>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match raw.parse::<T>() {
        Ok(id) => Ok(Some(id)),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable id in store");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_empty_store_is_anonymous() {
        let store = MemoryStore::new();
        let session = Session::load(&store).unwrap();
        assert_eq!(session.identity(), None);
        assert!(session.auth_token().is_none());
    }

    #[test]
    fn test_sign_in_persists_only_one_identity() {
        let mut store = MemoryStore::new();
        let mut session = Session::anonymous();

        session
            .sign_in(&mut store, Identity::Provider(ProviderId::new(2)))
            .unwrap();
        session
            .sign_in(&mut store, Identity::Customer(CustomerId::new(5)))
            .unwrap();

        assert_eq!(store.get(keys::CUSTOMER_ID).unwrap().as_deref(), Some("5"));
        assert_eq!(store.get(keys::PROVIDER_ID).unwrap(), None);

        let reloaded = Session::load(&store).unwrap();
        assert_eq!(reloaded.customer_id(), Some(CustomerId::new(5)));
        assert_eq!(reloaded.provider_id(), None);
        assert!(reloaded.owns_customer(CustomerId::new(5)));
        assert!(!reloaded.owns_customer(CustomerId::new(6)));
    }

    #[test]
    fn test_sign_out_clears_everything() {
        let mut store = MemoryStore::new();
        let mut session = Session::anonymous();
        session
            .sign_in(&mut store, Identity::Customer(CustomerId::new(1)))
            .unwrap();
        session
            .set_auth_token(&mut store, SecretString::from("abc"))
            .unwrap();
        session.sign_out(&mut store).unwrap();

        assert_eq!(session.identity(), None);
        assert_eq!(store.get(keys::AUTH_TOKEN).unwrap(), None);
        assert_eq!(Session::load(&store).unwrap().identity(), None);
    }

    #[test]
    fn test_garbage_id_ignored() {
        let mut store = MemoryStore::new();
        store.set(keys::CUSTOMER_ID, "undefined".to_string()).unwrap();
        store.set(keys::PROVIDER_ID, "4".to_string()).unwrap();
        let session = Session::load(&store).unwrap();
        assert_eq!(session.identity(), Some(Identity::Provider(ProviderId::new(4))));
    }
}
