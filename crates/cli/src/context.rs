//! Per-invocation state.

use glc_client::{ClientConfig, FileStore, ResourceClient, Session};
use tracing::debug;

use crate::StartupError;

/// Everything a command needs: the backend client, the local store and the
/// session read from it.
pub struct Context {
    pub client: ResourceClient,
    pub store: FileStore,
    pub session: Session,
}

impl Context {
    /// Open the state file and build the client.
    pub fn open(config: ClientConfig) -> Result<Self, StartupError> {
        let store = FileStore::open(&config.state_file)?;
        let session = Session::load(&store)?;
        let client = ResourceClient::new(&config, &session)?;
        debug!(
            base_url = %config.api_base_url,
            state_file = %config.state_file.display(),
            identity = ?session.identity(),
            "Context ready"
        );
        Ok(Self {
            client,
            store,
            session,
        })
    }
}
