pub mod engine;
pub mod error;
pub mod gate;
pub mod interaction;
pub mod network;
pub mod predicates;
pub mod source;

pub use engine::{update_circuit, CircuitEngine, PropagationStats, MAX_PROPAGATION_DEPTH};
pub use error::PlaceError;
pub use gate::{read_inputs, InputReading};
pub use interaction::{ClickOutcome, Placement};
pub use network::Net;
pub use predicates::{is_conductive, is_gate, is_rail};
pub use source::{is_power_source_for, signal_into};

#[cfg(test)]
mod test_support;
