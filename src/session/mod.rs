/// User-controlled rendering parameters.
pub mod state;
/// The interaction controller.
pub mod studio;
