// Security module: the path gate.
//
// Every page identifier that reaches the server is untrusted. This module
// canonicalizes it against the content root and classifies it before any
// file is opened.

pub mod canonical;
pub mod content_root;
pub mod path_gate;

pub use content_root::{ContentRoot, DenyEntry, DenyList};
pub use path_gate::{
    GateError, GatePolicy, PathGate, Resolution, VerifiedPage, resolve, resolve_with_policy,
};
