//! HTTP clients for external collaborators.

pub mod intra;
