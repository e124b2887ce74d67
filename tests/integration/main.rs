//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a slice of the node
//! against mock adapters.  All tests run on the host with no broker and
//! no real hardware.

mod command_tests;
mod mock_hw;
