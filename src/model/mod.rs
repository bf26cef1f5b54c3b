//! Card grid data model.
//!
//! `CardStore` and `BreakSet` are the only stored state of the engine; rows and
//! drop slots are always derived from them. `GridState` bundles the two so the
//! hosting session can pass a single value through the transition functions.

mod breaks;
mod card;
mod state;
mod store;

pub use breaks::BreakSet;
pub use card::{
    Card, CardId, CardPayload, CardWidth, ChartData, ContactsData, DEFAULT_SPAN, GRID_COLUMNS,
    MAX_SPAN, MIN_SPAN, Span, StatData, TextData,
};
pub use state::GridState;
pub use store::CardStore;
