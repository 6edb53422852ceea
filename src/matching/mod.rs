//! Track identities and the normalizer that makes them comparable.

pub mod normalize;
mod track;

pub use normalize::{canonicalize, normalize_title};
pub use track::Track;
