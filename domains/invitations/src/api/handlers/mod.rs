//! HTTP handlers for the trigger emulator

pub mod events;
