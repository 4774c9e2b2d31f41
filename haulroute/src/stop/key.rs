//! Route identity keys for change detection.
//!
//! A [`RouteKey`] is an opaque string derived from the effective route:
//! stop identities in effective order plus the required-break count. Two
//! keys compare equal exactly when the rendered route would be identical,
//! which is what gates recomputation in a session. It is not a uniqueness
//! or security token.

use std::fmt;

use super::{effective_order, RequiredBreak, Stop};

const STOP_SEPARATOR: &str = "|";

/// Opaque, order-sensitive identity for an effective route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey(String);

impl RouteKey {
    /// Derive the key for a route.
    ///
    /// The key is built over the *effective* ordering: the optimized stop
    /// list when supplied, the sequence-sorted stops otherwise. Equal
    /// logical inputs produce equal keys regardless of object identity.
    pub fn for_route(
        stops: &[Stop],
        optimized: Option<&[Stop]>,
        breaks: &[RequiredBreak],
    ) -> Self {
        let ordered = effective_order(stops, optimized);
        let fragments: Vec<String> = ordered.iter().map(|stop| stop.key_fragment()).collect();

        Self(format!(
            "{}#breaks:{}",
            fragments.join(STOP_SEPARATOR),
            breaks.len()
        ))
    }

    /// The raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
