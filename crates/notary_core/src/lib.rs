//! Notary core: pure poll state machine, item store and view-model helpers.
mod effect;
mod error;
mod item;
mod msg;
mod state;
mod store;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::NotaryError;
pub use item::{AccountId, Credential, Generation, HistoryItem, ItemDetail, Trigger};
pub use msg::Msg;
pub use state::{AppState, PollState};
pub use store::{merge, ItemStore, MergeStats};
pub use update::update;
pub use view_model::{AccountView, AppViewModel, HistoryRowView};
