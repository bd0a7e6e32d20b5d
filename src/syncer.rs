use std::{collections::HashSet, path::PathBuf, time::Instant};

use log::{debug, info, trace, warn};

use crate::clients::{
    Library, TsvExport,
    entities::{AddedTrack, Album, Track, display_tracks},
    errors::{Error, Result},
};

/// Page size used when listing saved albums (the API maximum)
pub const ALBUMS_PAGE_LIMIT: u32 = 50;

/// Configuration for the Syncer struct
pub struct Config<L> {
    pub library: L,
    pub dry_run: bool,
    pub skiplist: HashSet<String>,
    /// Where to export every saved-album track, if anywhere
    pub tsv_path: Option<PathBuf>,
}

pub struct ConfigBuilder<L> {
    library: Option<L>,
    dry_run: bool,
    skiplist: Option<HashSet<String>>,
    tsv_path: Option<PathBuf>,
}

impl<L: Library> Default for ConfigBuilder<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Library> ConfigBuilder<L> {
    pub fn new() -> Self {
        Self {
            library: None,
            dry_run: false,
            skiplist: None,
            tsv_path: None,
        }
    }

    #[must_use]
    pub fn library(mut self, library: L) -> Self {
        self.library = Some(library);
        self
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn skiplist(mut self, skiplist: HashSet<String>) -> Self {
        self.skiplist = Some(skiplist);
        self
    }

    #[must_use]
    pub fn tsv_path(mut self, path: Option<PathBuf>) -> Self {
        self.tsv_path = path;
        self
    }

    pub fn build(self) -> Result<Config<L>> {
        let library = self
            .library
            .ok_or_else(|| Error::ConfigurationError("No music library client configured".into()))?;
        Ok(Config {
            library,
            dry_run: self.dry_run,
            skiplist: self.skiplist.unwrap_or_default(),
            tsv_path: self.tsv_path,
        })
    }
}

/// Fetch every saved album, one page at a time.
///
/// Fails if the number of albums received differs from the total announced
/// by the first page.
pub async fn get_all_saved_albums<L: Library>(library: &L) -> Result<Vec<Album>> {
    let mut offset: u32 = 0;

    debug!("Getting all saved albums.");
    trace!("Getting first {ALBUMS_PAGE_LIMIT} albums.");
    let mut page = library.saved_albums_page(ALBUMS_PAGE_LIMIT, offset).await?;
    let expected_total = page.total;
    let mut albums = Vec::with_capacity(expected_total as usize);

    loop {
        let received = page.items.len();
        let has_next = page.has_next;
        albums.extend(page.items);
        // an empty page can't move the offset forward
        if !has_next || received == 0 {
            break;
        }

        offset = offset.saturating_add(u32::try_from(received).unwrap_or(u32::MAX));
        trace!("Getting next {ALBUMS_PAGE_LIMIT} albums (offset: {offset}, total: {expected_total})");
        page = library.saved_albums_page(ALBUMS_PAGE_LIMIT, offset).await?;
    }

    let actual_total = albums.len();
    if expected_total as usize != actual_total {
        return Err(Error::TotalMismatch {
            expected: expected_total,
            actual: actual_total,
        });
    }
    info!("Found {actual_total} saved albums");
    Ok(albums)
}

/// Remove any tracks that the user has already liked, keeping the input order.
pub async fn filter_tracks_to_add<L: Library>(library: &L, tracks: &[Track]) -> Result<Vec<Track>> {
    if tracks.is_empty() {
        return Ok(Vec::new());
    }
    let already_liked = library.liked_status(tracks).await?;
    if already_liked.len() != tracks.len() {
        return Err(Error::LikedStatusMismatch {
            expected: tracks.len(),
            actual: already_liked.len(),
        });
    }

    Ok(tracks
        .iter()
        .zip(already_liked)
        .filter(|(_, liked)| !liked)
        .map(|(track, _)| track.clone())
        .collect())
}

// The main Syncer struct that performs the reconciliation
pub struct Syncer<L> {
    config: Config<L>,
}

impl<L: Library> Syncer<L> {
    pub fn new(config: Config<L>) -> Self {
        Syncer { config }
    }

    pub async fn sync(&self) -> Result<Vec<AddedTrack>> {
        let dry_run = self.config.dry_run;
        info!(
            "Starting. dry_run={dry_run}, {} skiplisted tracks",
            self.config.skiplist.len()
        );
        let start_time = Instant::now();

        let mut export = match &self.config.tsv_path {
            Some(path) => Some(TsvExport::create(path)?),
            None => None,
        };

        let library = &self.config.library;
        let albums = get_all_saved_albums(library).await?;
        let mut added_tracks: Vec<AddedTrack> = Vec::new();

        for (n, album) in albums.iter().enumerate() {
            debug!("Processing album {} of {}: {album}", n + 1, albums.len());

            if let Some(export) = export.as_mut() {
                export.write_album(album)?;
            }

            let candidates = filter_tracks_to_add(library, &album.tracks).await?;
            if candidates.is_empty() {
                trace!("All tracks from {album} are already 'liked'.");
                continue;
            }

            let (skipped, need_to_add): (Vec<Track>, Vec<Track>) = candidates
                .into_iter()
                .partition(|t| self.config.skiplist.contains(&t.spotify_id));

            for track in &skipped {
                warn!("Skipping {track} from {album} because it's in the skiplist file.");
            }

            if need_to_add.is_empty() {
                info!(
                    "All {} potential tracks from {album} that could be added to the \
                     'Liked Songs' list are present in the skiplist file. Nothing to do.",
                    skipped.len()
                );
                continue;
            }

            info!(
                "Adding {} tracks from {album} to liked songs: {}",
                need_to_add.len(),
                display_tracks(&need_to_add)
            );

            if !dry_run {
                library.add_liked(&need_to_add).await?;
            }

            added_tracks.extend(need_to_add.into_iter().map(|track| AddedTrack {
                track,
                album: album.clone(),
            }));
        }

        let num_added = added_tracks.len();
        if num_added > 0 {
            info!("Added {num_added} tracks to liked songs.");
        } else {
            info!("No tracks to add - everything's up to date!");
        }
        info!("Took {:?} to run.", start_time.elapsed());

        if dry_run {
            warn!("Dry Run: no tracks added.");
        }
        if let Some(export) = &export {
            info!("Saved all tracks to {:?}", export.path());
        }

        Ok(added_tracks)
    }
}
