//! Boundary to the store's RPC client.
//!
//! Connecting, authenticating and wire (de)serialization belong to the
//! transport. The driver only issues calls and reads back decoded values.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::value::Value;

/// RPC method carrying query text and bound arguments.
pub const QUERY_COMMAND: &str = "query";

/// RPC method used as a liveness probe.
pub const SELECT_COMMAND: &str = "select";

/// An open session with the store.
#[async_trait]
pub trait Transport: Send {
    /// Issue one RPC call and return its decoded response.
    async fn send(&mut self, command: &str, args: Vec<Value>) -> Result<Value, BoxError>;

    /// Close the session.
    async fn close(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&mut self, command: &str, args: Vec<Value>) -> Result<Value, BoxError> {
        (**self).send(command, args).await
    }

    async fn close(&mut self) -> Result<(), BoxError> {
        (**self).close().await
    }
}
