// SOW wizard: normalize extracted fields, validate the form, drive the
// three-step state machine, and render each step as a view model.
// All collaborator calls go through sow_client; none happen in the reducer.

pub mod controller;
pub mod handlers;
pub mod machine;
pub mod normalize;
pub mod sessions;
pub mod validation;
pub mod views;
