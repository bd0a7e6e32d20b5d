use crate::clients::{
    entities::{AlbumPage, Track},
    errors::Result,
};

/// The operations the syncer needs from a music service.
///
/// `SpotifyClient` talks to the real API, tests use in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait Library {
    /// Fetch one page of the current user's saved albums.
    async fn saved_albums_page(&self, limit: u32, offset: u32) -> Result<AlbumPage>;

    /// Report for every given track whether it is already liked, in input order.
    async fn liked_status(&self, tracks: &[Track]) -> Result<Vec<bool>>;

    /// Add the given tracks to the user's liked songs.
    async fn add_liked(&self, tracks: &[Track]) -> Result<()>;
}
