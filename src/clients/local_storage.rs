use std::{
    collections::HashSet,
    fs::File,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::clients::{entities::Album, errors::Result};

const TSV_HEADERS: [&str; 4] = ["artist", "album", "track", "track_num"];

#[derive(Deserialize)]
struct SkiplistRow {
    spotify_id: String,
}

#[derive(Serialize)]
struct TsvRow<'a> {
    artist: &'a str,
    album: &'a str,
    track: &'a str,
    track_num: u32,
}

pub fn parse_skiplist_file(path: &Path) -> Result<HashSet<String>> {
    // rows may leave trailing note columns empty
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut skipped = HashSet::new();
    for row in reader.deserialize() {
        let row: SkiplistRow = row?;
        skipped.insert(row.spotify_id);
    }
    debug!("Read {} skiplisted track ids from {path:?}", skipped.len());
    Ok(skipped)
}

/// Read the skiplist file, if given and present.
///
/// The file is a CSV with a header row. Only the `spotify_id` column is used,
/// any other column is ignored.
pub fn read_skiplist_file(path: Option<&Path>) -> Result<HashSet<String>> {
    match path {
        Some(p) if p.exists() => parse_skiplist_file(p),
        _ => {
            warn!("Skiplist file {path:?} does not exist or was not given.");
            Ok(HashSet::new())
        }
    }
}

/// Tab separated export of every track in the saved albums
pub struct TsvExport {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl TsvExport {
    // Truncates any previous export and writes the header row
    pub fn create(path: &Path) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(b'\t')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(path)?;
        writer.write_record(TSV_HEADERS)?;
        writer.flush()?;
        debug!("Writing tracks export to {path:?}");
        Ok(TsvExport {
            path: path.to_path_buf(),
            writer,
        })
    }

    pub fn write_album(&mut self, album: &Album) -> Result<()> {
        for track in &album.tracks {
            self.writer.serialize(TsvRow {
                artist: &album.artist_name,
                album: &album.name,
                track: &track.name,
                track_num: track.track_number,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::entities::{AlbumType, DatePrecision, Track};
    use tempfile::TempDir;

    fn skiplist_from(contents: &str) -> HashSet<String> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skiplist.csv");
        std::fs::write(&path, contents).unwrap();
        read_skiplist_file(Some(&path)).unwrap()
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_read_skiplist_file() {
        assert_eq!(skiplist_from("spotify_id,album\nfoo,bar"), set(&["foo"]));
        assert_eq!(
            skiplist_from("name,spotify_id,album\napple,foo,bar"),
            set(&["foo"])
        );
        assert_eq!(skiplist_from("spotify_id\nfoo\nbar"), set(&["foo", "bar"]));
        assert_eq!(skiplist_from("spotify_id\r\nfoo"), set(&["foo"]));
    }

    #[test]
    fn test_skiplist_rows_may_omit_trailing_columns() {
        assert_eq!(
            skiplist_from("spotify_id,artist,note\nfoo,Fleetwood Mac,live\nbar\n"),
            set(&["foo", "bar"])
        );
    }

    #[test]
    fn test_missing_skiplist_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.csv");
        assert!(read_skiplist_file(Some(&path)).unwrap().is_empty());
        assert!(read_skiplist_file(None).unwrap().is_empty());
    }

    #[test]
    fn test_skiplist_without_id_column_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skiplist.csv");
        std::fs::write(&path, "name,album\napple,bar\n").unwrap();
        assert!(read_skiplist_file(Some(&path)).is_err());
    }

    #[test]
    fn test_tsv_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracks.tsv");
        std::fs::write(&path, "stale contents\n").unwrap();

        let track = |n: u32, name: &str| Track {
            spotify_id: format!("id{n}"),
            duration_ms: 1000,
            explicit: false,
            uri: format!("spotify:track:id{n}"),
            name: name.to_string(),
            href: None,
            track_number: n,
        };
        let album = Album {
            spotify_id: "alb".into(),
            uri: "spotify:album:alb".into(),
            name: "Heroes".into(),
            album_type: AlbumType::Album,
            href: "https://api.spotify.com/v1/albums/alb".into(),
            release_date: "1977".into(),
            release_date_precision: DatePrecision::Year,
            artist_name: "David Bowie,Brian Eno".into(),
            tracks: vec![track(1, "Beauty and the Beast"), track(3, "Heroes")],
        };

        let mut export = TsvExport::create(&path).unwrap();
        assert_eq!(export.path(), path.as_path());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "artist\talbum\ttrack\ttrack_num\n"
        );

        export.write_album(&album).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "artist\talbum\ttrack\ttrack_num\n\
             David Bowie,Brian Eno\tHeroes\tBeauty and the Beast\t1\n\
             David Bowie,Brian Eno\tHeroes\tHeroes\t3\n"
        );
    }
}
