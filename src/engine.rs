//! Connection and statement façade.
//!
//! This module provides the prepare / exec / query surface on top of a
//! [`Transport`]. Every call goes through the same pipeline:
//! normalize text → bind arguments → `query` RPC → classify envelope.

use std::time::Duration;

use crate::binder::{self, Args, Binder};
use crate::config::Config;
use crate::error::{SurrealError, SurrealResult};
use crate::query;
use crate::response;
use crate::row::Rows;
use crate::transport::{QUERY_COMMAND, SELECT_COMMAND, Transport};
use crate::value::Value;

/// A single session with the store.
///
/// Methods take `&mut self`; sharing one connection between tasks needs
/// external serialization such as a pool or a mutex.
pub struct Conn<T> {
    transport: T,
    binder: Binder,
    timeout: Option<Duration>,
}

impl<T: Transport> Conn<T> {
    /// Wrap an established transport session.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut conn = Conn::new(transport);
    /// let mut rows = conn
    ///     .query("SELECT * FROM user WHERE name = $name", named("name", "mark"))
    ///     .await?;
    /// ```
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, &Config::default())
    }

    pub fn with_config(transport: T, config: &Config) -> Self {
        Self {
            transport,
            binder: Binder::from(&config.binder),
            timeout: config.connection.timeout(),
        }
    }

    /// Create a statement for `query`. Nothing is sent yet.
    pub fn prepare(&mut self, query: &str) -> Stmt<'_, T> {
        Stmt {
            conn: self,
            raw_query: query.to_string(),
            state: StmtState::Created,
        }
    }

    /// Run a query and return its rows.
    pub async fn query(&mut self, query: &str, args: impl Into<Args>) -> SurrealResult<Rows> {
        self.execute(query, &args.into()).await
    }

    /// Run a statement and report how many rows it produced.
    pub async fn exec(&mut self, query: &str, args: impl Into<Args>) -> SurrealResult<ExecResult> {
        let rows = self.execute(query, &args.into()).await?;
        Ok(ExecResult::from(&rows))
    }

    /// Send one query and classify the response.
    pub async fn execute(&mut self, query: &str, args: &Args) -> SurrealResult<Rows> {
        let text = query::prepare_query(query);
        let bound = binder::bind(args);
        tracing::debug!(query = %text, named = bound.is_named(), args = args.len(), "sending query");

        let mut wire = Vec::with_capacity(2);
        wire.push(Value::String(text));
        wire.extend(bound.into_wire());

        let response = self.send(QUERY_COMMAND, wire).await?;
        let rows = response::classify(response)?;
        tracing::debug!(rows = rows.len(), "query succeeded");
        Ok(Rows::new(rows))
    }

    async fn send(&mut self, command: &str, args: Vec<Value>) -> SurrealResult<Value> {
        let call = self.transport.send(command, args);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| SurrealError::Timeout(limit))?,
            None => call.await,
        };
        result.map_err(SurrealError::Transport)
    }

    /// Transactions are not supported by this driver.
    pub fn begin(&mut self) -> SurrealResult<()> {
        Err(SurrealError::Unsupported("transactions"))
    }

    /// Check the session is alive.
    pub async fn ping(&mut self) -> SurrealResult<()> {
        self.send(SELECT_COMMAND, vec![Value::from("1")]).await?;
        Ok(())
    }

    /// Nothing to reset; sessions hold no per-call state.
    pub fn reset_session(&mut self) -> SurrealResult<()> {
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        true
    }

    /// Close the underlying session.
    pub async fn close(mut self) -> SurrealResult<()> {
        self.transport.close().await.map_err(SurrealError::Transport)
    }

    /// Binder configured for this connection.
    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    /// Limit each transport call to `timeout`, or remove the limit.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Lifecycle of a prepared statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtState {
    Created,
    Executing,
    Completed,
    Failed,
}

/// A prepared statement bound to its connection.
pub struct Stmt<'c, T> {
    conn: &'c mut Conn<T>,
    raw_query: String,
    state: StmtState,
}

impl<T: Transport> Stmt<'_, T> {
    /// Number of `$name` placeholder occurrences in the query text.
    pub fn num_input(&self) -> usize {
        query::num_input(&self.raw_query)
    }

    pub fn state(&self) -> StmtState {
        self.state
    }

    pub fn query_text(&self) -> &str {
        &self.raw_query
    }

    /// Run the statement and return its rows.
    pub async fn query(&mut self, args: impl Into<Args>) -> SurrealResult<Rows> {
        self.run(args.into()).await
    }

    /// Run the statement and report how many rows it produced.
    pub async fn exec(&mut self, args: impl Into<Args>) -> SurrealResult<ExecResult> {
        let rows = self.run(args.into()).await?;
        Ok(ExecResult::from(&rows))
    }

    async fn run(&mut self, args: Args) -> SurrealResult<Rows> {
        self.state = StmtState::Executing;
        let result = self.conn.execute(&self.raw_query, &args).await;
        self.state = match result {
            Ok(_) => StmtState::Completed,
            Err(_) => StmtState::Failed,
        };
        result
    }

    pub fn close(self) -> SurrealResult<()> {
        Ok(())
    }
}

/// Outcome of an exec-style call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    /// Rows in the result set; the store reports no separate change count
    pub rows_affected: u64,
}

impl ExecResult {
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// The store has no numeric auto-increment ids.
    pub fn last_insert_id(&self) -> SurrealResult<i64> {
        Err(SurrealError::Unsupported("numeric auto-increment ids"))
    }
}

impl From<&Rows> for ExecResult {
    fn from(rows: &Rows) -> Self {
        Self {
            rows_affected: rows.len() as u64,
        }
    }
}
