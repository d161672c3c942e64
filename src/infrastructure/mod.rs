//! Infrastructure layer implementing the domain's data-access contracts.

pub mod persistence;
