// Core modules implementing collection, decoding, extraction, and error modeling.
pub mod actions;
pub mod collect;
pub mod error;
pub mod extract;
pub mod layout;
pub mod load;
pub mod model;
pub mod normalize;
pub mod readme;
pub mod report;
