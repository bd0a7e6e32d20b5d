//! Likesync - add the tracks of your saved Spotify albums to Liked Songs
//!
//! This library walks every album saved in a Spotify library, finds the tracks
//! that are not liked yet and likes them, honoring a skiplist of track ids
//! that must never be added.

/// Client modules for interacting with Spotify and local files
pub mod clients;
/// Console and file logging setup
pub mod logging;
/// The saved albums to liked songs reconciliation
pub mod syncer;
