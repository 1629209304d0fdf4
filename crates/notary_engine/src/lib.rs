//! Notary engine: tool invocation, response decoding and poll-cycle execution.
mod credentials;
mod decode;
mod engine;
mod enrich;
mod history;
mod tool;
mod types;

pub use credentials::{CredentialProvider, SessionCredentials};
pub use decode::{decode_history_page, decode_log_url, decode_product_error, DecodeError, Page};
pub use engine::{EngineHandle, PollSettings};
pub use enrich::{enrich, EnrichFailure, Enrichment};
pub use history::fetch_all_history;
pub use tool::{
    redact_args, Altool, Operation, ProcessRunner, RawOutput, ToolOutput, ToolRunner,
    ToolSettings,
};
pub use types::EngineEvent;
