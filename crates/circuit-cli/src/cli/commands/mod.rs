pub(crate) mod admin;
pub(crate) mod check;
mod dispatch;
pub(crate) mod genesis;
pub(crate) mod session;
pub(crate) mod status;

pub use dispatch::dispatch;
