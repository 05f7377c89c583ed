//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in the host application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Application code...
//! }
//! ```
//!
//! The engines never log user-visible failures on their own behalf; what gets
//! traced here are the deliberately non-fatal events the host may want to
//! observe — dropped includes, swallowed predicate errors, cache flushes.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Adapter resolution engine target.
    pub const ADAPTER: &str = "trellis::adapter";
    /// View tree / shadow materialization target.
    pub const VIEW: &str = "trellis::view";
    /// Predicate evaluation target.
    pub const PREDICATE: &str = "trellis::view::predicate";
}
