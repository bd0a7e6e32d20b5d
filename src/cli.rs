use std::path::PathBuf;

use clap::{ArgAction, Parser};
use likesync::{
    clients::{SpotifyClient, entities::AddedTrack, errors::Result, local_storage},
    logging, syncer,
};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "likesync")]
#[command(version, about = "Add every track of your saved Spotify albums to Liked Songs", long_about = None)]
pub struct Cli {
    /// Do not update 'Liked' songs.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Increase printed messages. Can be provided multiple times.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// The file containing skiplisted track IDs. See README for required format.
    #[arg(short, long, default_value = "skiplist.csv")]
    pub skiplist_file: PathBuf,

    /// Save a tsv file of all saved-album tracks
    #[arg(long)]
    pub save_tsv: bool,

    /// Where --save-tsv writes to
    #[arg(long, default_value = "tracks.tsv")]
    pub tsv_file: PathBuf,

    /// Also write a full trace log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn run() -> Result<Vec<AddedTrack>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_file.as_deref())?;
    sync_tracks(&cli).await
}

async fn sync_tracks(cli: &Cli) -> Result<Vec<AddedTrack>> {
    let skiplist = local_storage::read_skiplist_file(Some(&cli.skiplist_file))?;

    info!("Authorizing client ...");
    let spotify = SpotifyClient::try_default(cli.dry_run)?;
    // CLI prompt may be shown here
    spotify.authorize_client().await?;

    let config = syncer::ConfigBuilder::new()
        .library(spotify)
        .dry_run(cli.dry_run)
        .skiplist(skiplist)
        .tsv_path(cli.save_tsv.then(|| cli.tsv_file.clone()))
        .build()?;
    syncer::Syncer::new(config).sync().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["likesync"]).unwrap();
        assert!(!cli.dry_run);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.skiplist_file, PathBuf::from("skiplist.csv"));
        assert!(!cli.save_tsv);
        assert_eq!(cli.tsv_file, PathBuf::from("tracks.tsv"));
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_short_flags() {
        let cli =
            Cli::try_parse_from(["likesync", "-n", "-vvv", "-s", "skip.csv", "--save-tsv"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.skiplist_file, PathBuf::from("skip.csv"));
        assert!(cli.save_tsv);
    }

    #[test]
    fn test_verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
