/// Marker for immutable values compared by content (`Money`, `PointRate`).
///
/// Constructors validate, so any instance in hand is a valid one. To change a
/// value, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
