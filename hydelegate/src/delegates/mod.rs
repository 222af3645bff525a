//! One module per delegate variant. Each implements the accessor contract from
//! [`crate::accessor`] and nothing else; none of them knows about the others.

pub mod alias;
pub mod keyed;
pub mod lazy;
pub mod observable;
