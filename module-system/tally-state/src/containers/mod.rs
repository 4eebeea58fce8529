/// A container that maps keys to values.
pub mod map;
/// A container for a single value.
pub mod value;
/// An append-friendly, indexed sequence container.
pub mod vec;

pub use map::StateMap;
pub use value::StateValue;
pub use vec::StateVec;
