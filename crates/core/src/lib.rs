//! Deterministic core of the Streambot sales assistant: the product catalog,
//! lexical extractors, receipt rendering, the per-visitor order conversation
//! state machine, and configuration.
//!
//! Everything here is rule-based. The generative fallback lives in
//! `streambot-agent` and is only consulted when `flow::OrderFlow::respond`
//! produces no deterministic reply.

pub mod catalog;
pub mod config;
pub mod extract;
pub mod flow;
pub mod order;
pub mod receipt;
pub mod session;

pub use catalog::{Product, ProductCatalog, ProductId};
pub use extract::{extract_quantity, parse_contact_details, ContactDetails};
pub use flow::OrderFlow;
pub use order::{ConversationMemory, Intent, Order, PendingOrder, PLATFORM_FEE};
pub use receipt::{format_currency, format_receipt, summarize_orders};
pub use session::{MemorySessionStore, SessionStore, VisitorSession};
