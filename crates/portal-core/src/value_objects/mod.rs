//! Value objects - immutable domain primitives

mod cpf;
mod role;

pub use cpf::{Cpf, CpfParseError};
pub use role::Role;
