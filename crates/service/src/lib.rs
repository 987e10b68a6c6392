//! Service layer of the retail backend.
//! - `gateway`: table/blob/queue/file operations that never fail loudly.
//! - `sql`: relational CRUD and reports on top of `models`.
//! - `storage`: backend traits and their local implementations.

pub mod errors;
pub mod gateway;
pub mod observability;
pub mod sql;
pub mod storage;
#[cfg(test)]
pub mod test_support;

pub use gateway::StorageGateway;
pub use sql::RetailDataService;
