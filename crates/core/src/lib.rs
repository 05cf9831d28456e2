//! Pure domain primitives for the loyalty workspace: identifiers, money and
//! the aggregate traits. No IO.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::DomainError;
pub use id::{EventId, MemberId, OrderSn};
pub use money::{Money, PointRate};
pub use value_object::ValueObject;
