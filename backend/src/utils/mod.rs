//! Collection of general utility functions.
//!
//! Token signing, random secrets and the object storage client live here
//! because they carry no business rules of their own.

pub mod generate_random_string;
pub mod jwt;
pub mod object_storage;
