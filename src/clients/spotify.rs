use std::{future::Future, path::PathBuf};

use log::{debug, trace};

use crate::clients::{
    entities::{Album, AlbumPage, AlbumType, DatePrecision, Track},
    errors::{Error, Result},
    library::Library,
};
use rspotify::{
    AuthCodeSpotify, Config, Credentials, OAuth,
    model::{self, FullAlbum, SimplifiedArtist, SimplifiedTrack, TrackId},
    prelude::*,
    scopes,
};

/// Most ids the library endpoints accept per request
pub const ID_CHUNK_SIZE: usize = 50;
/// Page size used when an album has more tracks than its embedded page
const ALBUM_TRACKS_PAGE: u32 = 50;

impl From<model::AlbumType> for AlbumType {
    fn from(t: model::AlbumType) -> AlbumType {
        match t {
            model::AlbumType::Album => AlbumType::Album,
            model::AlbumType::Single => AlbumType::Single,
            model::AlbumType::Compilation => AlbumType::Compilation,
            model::AlbumType::AppearsOn => AlbumType::AppearsOn,
        }
    }
}

impl From<model::DatePrecision> for DatePrecision {
    fn from(p: model::DatePrecision) -> DatePrecision {
        match p {
            model::DatePrecision::Year => DatePrecision::Year,
            model::DatePrecision::Month => DatePrecision::Month,
            model::DatePrecision::Day => DatePrecision::Day,
        }
    }
}

// Local files have no Spotify id and can't be liked, so they are dropped here
fn track_from_api(t: SimplifiedTrack) -> Option<Track> {
    let Some(id) = t.id else {
        debug!("Ignoring local track '{}' without a Spotify id", t.name);
        return None;
    };
    Some(Track {
        spotify_id: id.id().to_string(),
        duration_ms: t.duration.num_milliseconds(),
        explicit: t.explicit,
        uri: id.uri(),
        name: t.name,
        href: t.href,
        track_number: t.track_number,
    })
}

fn join_artist_names(artists: &[SimplifiedArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn album_from_api(album: FullAlbum, tracks: Vec<SimplifiedTrack>) -> Album {
    Album {
        spotify_id: album.id.id().to_string(),
        uri: album.id.uri(),
        name: album.name,
        album_type: album.album_type.into(),
        href: album.href,
        release_date: album.release_date,
        release_date_precision: album.release_date_precision.into(),
        artist_name: join_artist_names(&album.artists),
        tracks: tracks.into_iter().filter_map(track_from_api).collect(),
    }
}

fn track_ids(tracks: &[Track]) -> Result<Vec<TrackId<'_>>> {
    tracks
        .iter()
        .map(|t| TrackId::from_id(t.spotify_id.as_str()).map_err(Error::from))
        .collect()
}

// Runs one request per chunk of at most ID_CHUNK_SIZE tracks; no tracks, no request
async fn in_chunks<'a, R, F, Fut>(tracks: &'a [Track], mut request: F) -> Result<Vec<R>>
where
    F: FnMut(&'a [Track]) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let mut results = Vec::with_capacity(tracks.len().div_ceil(ID_CHUNK_SIZE));
    for chunk in tracks.chunks(ID_CHUNK_SIZE) {
        results.push(request(chunk).await?);
    }
    Ok(results)
}

// Fetches pages starting at the number of items held until `total` is reached
// or a page comes back empty
async fn complete_pages<T, F, Fut>(mut items: Vec<T>, total: u32, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    while items.len() < total as usize {
        let offset = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let page = fetch_page(offset).await?;
        if page.is_empty() {
            break;
        }
        items.extend(page);
    }
    Ok(items)
}

pub struct SpotifyClient {
    pub spotify: AuthCodeSpotify,
}

impl SpotifyClient {
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        SpotifyClient { spotify }
    }

    // Authorize the Spotify client via CLI prompt and OAuth flow
    // This function requires the `cli` feature enabled.
    pub async fn authorize_client(&self) -> Result<()> {
        debug!("Starting Spotify authorization ...");
        let url = self.spotify.get_authorize_url(false)?;
        self.spotify.prompt_for_token(&url).await?;
        let user = self.spotify.me().await?;
        debug!("Authenticated as user: {:?}", user.display_name);
        Ok(())
    }

    // Create a SpotifyClient from environment variables or raise a configuration error.
    // A dry run only asks for read access to the library.
    pub fn try_default(dry_run: bool) -> Result<Self> {
        let creds = Credentials::from_env()
        .ok_or_else(|| Error::ConfigurationError("Missing Spotify credentials in environment variables. Check README.md for details.".into()))?;

        let mut scopes = scopes!("user-library-read");
        if !dry_run {
            scopes.insert("user-library-modify".to_string());
        }
        let oauth = OAuth::from_env(scopes)
        .ok_or_else(|| Error::ConfigurationError("Missing Spotify OAuth configuration in environment variables. Check README.md for details.".into()))?;

        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join(".likesync_token_cache");

        let spotify = AuthCodeSpotify::with_config(
            creds,
            oauth,
            Config {
                token_cached: true,
                cache_path,
                ..Default::default()
            },
        );

        Ok(Self::new(spotify))
    }

    // Saved albums embed only the first page of their tracks; fetch the rest if needed
    async fn build_album(&self, mut album: FullAlbum) -> Result<Album> {
        let embedded = std::mem::take(&mut album.tracks.items);
        let total = album.tracks.total;
        let album_id = album.id.as_ref();
        let name = album.name.as_str();

        let tracks = complete_pages(embedded, total, |offset| {
            let album_id = album_id.clone();
            async move {
                trace!(
                    "Getting next {ALBUM_TRACKS_PAGE} tracks of '{name}' (offset: {offset}, total: {total})"
                );
                let page = self
                    .spotify
                    .album_track_manual(album_id, None, Some(ALBUM_TRACKS_PAGE), Some(offset))
                    .await?;
                Ok::<_, Error>(page.items)
            }
        })
        .await?;

        Ok(album_from_api(album, tracks))
    }
}

impl Library for SpotifyClient {
    async fn saved_albums_page(&self, limit: u32, offset: u32) -> Result<AlbumPage> {
        let page = self
            .spotify
            .current_user_saved_albums_manual(None, Some(limit), Some(offset))
            .await?;

        let mut items = Vec::with_capacity(page.items.len());
        for saved in page.items {
            items.push(self.build_album(saved.album).await?);
        }

        Ok(AlbumPage {
            items,
            total: page.total,
            has_next: page.next.is_some(),
        })
    }

    async fn liked_status(&self, tracks: &[Track]) -> Result<Vec<bool>> {
        let pages = in_chunks(tracks, |chunk| async move {
            let ids = track_ids(chunk)?;
            Ok::<_, Error>(self.spotify.current_user_saved_tracks_contains(ids).await?)
        })
        .await?;
        Ok(pages.into_iter().flatten().collect())
    }

    async fn add_liked(&self, tracks: &[Track]) -> Result<()> {
        in_chunks(tracks, |chunk| async move {
            let ids = track_ids(chunk)?;
            self.spotify.current_user_saved_tracks_add(ids).await?;
            Ok::<_, Error>(())
        })
        .await?;
        Ok(())
    }
}
