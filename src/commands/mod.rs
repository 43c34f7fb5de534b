//! Subcommand handlers.
//!
//! Each file in this module corresponds to one user-facing command:
//!
//! | File      | Invocation   | Description                               |
//! |-----------|--------------|-------------------------------------------|
//! | `get.rs`  | `scrum get`  | Read one user's entry, or a whole day's   |
//! | `set.rs`  | `scrum set`  | Post an entry, or leave for several days  |

pub mod get;
pub mod set;
