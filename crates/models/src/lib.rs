//! Entities for both storage paths.
//!
//! `customer`, `product` and `order` are the relational (sea-orm) variant;
//! [`table`] holds the schema-less table-storage variant.
pub mod errors;
pub mod db;
pub mod validation;
pub mod customer;
pub mod product;
pub mod order;
pub mod table;

#[cfg(test)]
mod tests;
