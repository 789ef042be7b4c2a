//! Client for browsing and mutating repository trees hosted on a remote
//! source-control service, with content-hash optimistic concurrency on
//! every write and delete.

pub mod model;
pub mod nav;
pub mod prefs;
pub mod remote;
pub mod session;
pub mod sync;
