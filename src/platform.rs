//! Platforms that upstream publishes release archives for.
//!
//! Each entry maps a Nix system string to the Rust target triple used in the
//! upstream asset name. Table order is the order of attributes in the
//! generated expression.

/// A Nix system paired with the cargo target it is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Nix system, e.g. `x86_64-linux`
    pub system: &'static str,
    /// Rust target triple, e.g. `x86_64-unknown-linux-gnu`
    pub target: &'static str,
}

pub const PLATFORMS: [Platform; 4] = [
    Platform {
        system: "x86_64-linux",
        target: "x86_64-unknown-linux-gnu",
    },
    Platform {
        system: "aarch64-linux",
        target: "aarch64-unknown-linux-gnu",
    },
    Platform {
        system: "x86_64-darwin",
        target: "x86_64-apple-darwin",
    },
    Platform {
        system: "aarch64-darwin",
        target: "aarch64-apple-darwin",
    },
];
