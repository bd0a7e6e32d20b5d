/// Data entities for albums and tracks
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// The music service operations the syncer relies on
pub mod library;
/// Skiplist reading and TSV export
pub mod local_storage;
/// Spotify API client
pub mod spotify;

pub use library::Library;
pub use local_storage::TsvExport;
pub use spotify::SpotifyClient;
