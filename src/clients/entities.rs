use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumType {
    Album,
    Single,
    Compilation,
    AppearsOn,
}

impl AlbumType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlbumType::Album => "album",
            AlbumType::Single => "single",
            AlbumType::Compilation => "compilation",
            AlbumType::AppearsOn => "appears_on",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

impl DatePrecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePrecision::Year => "year",
            DatePrecision::Month => "month",
            DatePrecision::Day => "day",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub spotify_id: String,
    pub duration_ms: i64,
    pub explicit: bool,
    pub uri: String,
    pub name: String,
    pub href: Option<String>,
    pub track_number: u32,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Track('{}: {}')", self.spotify_id, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub spotify_id: String,
    pub uri: String,
    pub name: String,
    pub album_type: AlbumType,
    pub href: String,
    pub release_date: String,
    pub release_date_precision: DatePrecision,
    /// Every artist name, comma separated
    pub artist_name: String,
    pub tracks: Vec<Track>,
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Album({}: '{}')", self.artist_name, self.name)
    }
}

/// A track that was (or, on a dry run, would have been) added to Liked Songs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedTrack {
    pub track: Track,
    pub album: Album,
}

/// One page of the user's saved albums
#[derive(Debug, Default)]
pub struct AlbumPage {
    pub items: Vec<Album>,
    pub total: u32,
    pub has_next: bool,
}

/// Renders a list of tracks as `[Track('a: A'), Track('b: B')]` for log lines.
pub fn display_tracks(tracks: &[Track]) -> String {
    let names: Vec<String> = tracks.iter().map(ToString::to_string).collect();
    format!("[{}]", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, name: &str) -> Track {
        Track {
            spotify_id: id.to_string(),
            duration_ms: 5,
            explicit: true,
            uri: format!("spotify:track:{id}"),
            name: name.to_string(),
            href: None,
            track_number: 4,
        }
    }

    #[test]
    fn test_track_display() {
        assert_eq!(track("foo", "Track Name").to_string(), "Track('foo: Track Name')");
    }

    #[test]
    fn test_album_display() {
        let album = Album {
            spotify_id: "abc".into(),
            uri: "spotify:album:abc".into(),
            name: "Rumours".into(),
            album_type: AlbumType::Album,
            href: "https://api.spotify.com/v1/albums/abc".into(),
            release_date: "1977-02-04".into(),
            release_date_precision: DatePrecision::Day,
            artist_name: "Fleetwood Mac".into(),
            tracks: vec![],
        };
        assert_eq!(album.to_string(), "Album(Fleetwood Mac: 'Rumours')");
    }

    #[test]
    fn test_display_tracks() {
        let tracks = [track("a", "One"), track("b", "Two")];
        assert_eq!(display_tracks(&tracks), "[Track('a: One'), Track('b: Two')]");
        assert_eq!(display_tracks(&[]), "[]");
    }
}
