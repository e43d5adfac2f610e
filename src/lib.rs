//! # surreal-sql
//!
//! > **Prepare, execute, scan.** A relational-style driver surface for
//! > schema-less graph document stores.
//!
//! Query text goes to the store almost verbatim; the driver binds
//! arguments, classifies the response envelope and decodes loosely typed
//! values into Rust types.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use surreal_sql::prelude::*;
//!
//! let mut conn = Conn::new(transport);
//! let mut rows = conn
//!     .query(
//!         "SELECT id, name, ->posted AS posted, ->posted->post AS posts
//!          FROM user WHERE name = $name FETCH posts, posted",
//!         named("name", "mark"),
//!     )
//!     .await?;
//!
//! while rows.next() {
//!     let mut id = RecordId::default();
//!     let mut name = String::new();
//!     let mut posted: Many<Posted> = Many::default();
//!     let mut posts: Many<Post> = Many::default();
//!     // columns come back in alphabetical order
//!     rows.scan(&mut [&mut id, &mut name, &mut posted, &mut posts])?;
//! }
//! ```
//!
//! ## Decoders
//!
//! | Type          | Accepts                                  |
//! |---------------|------------------------------------------|
//! | `StoreTime`   | RFC3339 datetime string                  |
//! | `RecordUuid`  | `` user:`<uuid>` ``, `user:⟨<uuid>⟩`      |
//! | `AutoId`      | `post:42` → `42`                         |
//! | `RecordId`    | `table:key`, unchanged                   |
//! | `StringArray` | array of strings                         |
//! | `IntArray`    | array of integers                        |
//! | `FloatArray`  | array of numbers                         |
//! | `Many<T>`     | array of records (`null` → empty)        |
//! | `Record<T>`   | single record                            |

pub mod binder;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod query;
pub mod response;
pub mod row;
pub mod transport;
pub mod types;
pub mod value;

pub mod prelude {
    pub use crate::binder::{
        Args, Binder, BoundArgs, Entity, FieldDescriptor, NamedValue, named, struct_to_named_args,
    };
    pub use crate::config::Config;
    pub use crate::engine::{Conn, ExecResult, Stmt, StmtState};
    pub use crate::entity::{BaseEntity, BaseRelationship};
    pub use crate::error::*;
    pub use crate::row::{Dest, Row, Rows};
    pub use crate::transport::Transport;
    pub use crate::types::*;
    pub use crate::value::Value;
}

pub use engine::Conn;
pub use error::{SurrealError, SurrealResult};
pub use value::Value;

/// Normalize multi-line query text onto one line.
///
/// # Example
///
/// ```
/// let q = surreal_sql::prepare_query("SELECT *\n    FROM user\n");
/// assert_eq!(q, "SELECT * FROM user");
/// ```
pub fn prepare_query(query: &str) -> String {
    query::prepare_query(query)
}
