//! Unit tests for the repository synchronisation state machine.
//!
//! Split by workflow: enablement rules, the commit path, bootstrap, and the
//! remote operations.

mod commit;
