pub mod inspector;
pub mod reselect;
pub mod session;
pub mod store;
pub mod sync;
