//! Q&A Board (qaboard)
//!
//! Terminal client for a tagged question and answer board backed by a
//! record store, plus the maintenance commands that seed and reset it.
//!
//! Pure core: [`model`], [`query`], [`state`]. Impure shell: [`store`],
//! [`fetch`], [`view`], [`maintenance`], [`config`], [`logging`].

pub mod config;
pub mod fetch;
pub mod logging;
pub mod maintenance;
pub mod model;
pub mod query;
pub mod state;
pub mod store;
pub mod view;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
