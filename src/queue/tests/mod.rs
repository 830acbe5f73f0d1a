//! Test module organization for the bounded channel
