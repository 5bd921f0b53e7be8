//! Session store implementations

mod cloudant;
mod traits;

pub use cloudant::CloudantStore;
pub use traits::SessionStore;
