/*!
Items related to [logging](log).

Calls to the log macros are made throughout the library with one of the
targets below, so output can be filtered per concern (for example
`RUST_LOG=search=debug`).

No log implementation is provided by the library; the `hilbert` binary
installs `env_logger`.
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to the [search loop](crate::prover)
    pub const SEARCH: &str = "search";

    /// Logs related to [unification](crate::unification)
    pub const UNIFY: &str = "unify";

    /// Logs related to [proof reconstruction](crate::proof)
    pub const PROOF: &str = "proof";
}
