pub mod harness;

#[allow(unused_imports)]
pub use harness::{read_json, BridgeHarness, Outcome};
