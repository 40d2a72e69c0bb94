//! studio-session - recording session core for a desktop screen recorder
//!
//! This crate tracks capture devices and OS permissions, validates the
//! user's source selection, and drives a recording session through
//! idle, recording and export.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Device registry, permission tracker, source selection, session state machine
//! - **Application**: The `Studio` use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal discovery, recorder process, exporter, XDG config)
//! - **CLI**: Command-line interface, argument parsing, logging and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
