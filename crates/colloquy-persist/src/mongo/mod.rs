mod conversations;
mod turns;

pub use conversations::MongoConversationStore;
pub use turns::MongoTurnStore;

use mongodb::Client;

use crate::error::{PersistError, Result};

/// Connect to MongoDB, mapping driver failures to a connection error
pub async fn connect(uri: &str) -> Result<Client> {
    Client::with_uri_str(uri)
        .await
        .map_err(|e| PersistError::Connection(e.to_string()))
}
