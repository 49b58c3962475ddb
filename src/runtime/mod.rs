mod state;

pub use state::{FlowState, HistoryEntry, Record};
