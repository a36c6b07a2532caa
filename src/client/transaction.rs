use crate::session::ClientSession;
use serde::Deserialize;
use std::num::NonZeroU32;

#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestTransaction {
    pub(crate) client_id: NonZeroU32,
    pub(crate) client_transaction_id: NonZeroU32,
}

impl RequestTransaction {
    pub(crate) fn new(session: &ClientSession) -> Self {
        Self {
            client_id: session.client_id(),
            client_transaction_id: session.next_transaction_id(),
        }
    }

    pub(crate) fn append_to(self, params: &mut Vec<(String, String)>, lowercase_keys: bool) {
        let key = |name: &str| {
            if lowercase_keys {
                name.to_ascii_lowercase()
            } else {
                name.to_owned()
            }
        };

        params.push((key("ClientID"), self.client_id.to_string()));
        params.push((
            key("ClientTransactionID"),
            self.client_transaction_id.to_string(),
        ));
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct ResponseTransaction {
    #[serde(rename = "ClientTransactionID")]
    pub(crate) client_transaction_id: Option<u32>,
    #[serde(rename = "ServerTransactionID")]
    pub(crate) server_transaction_id: Option<u32>,
}

#[derive(Debug)]
pub(crate) struct ResponseWithTransaction<T> {
    pub(crate) transaction: ResponseTransaction,
    pub(crate) response: T,
}
