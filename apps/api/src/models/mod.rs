pub mod extraction;
pub mod form;
pub mod recommendation;
