use std::path::PathBuf;

use clap::{Parser, Subcommand};

use clef_quest::{Clef, NoteIndex};

/// Top-level CLI parser for the `clef-quest` binary.
#[derive(Debug, Parser)]
#[command(name = "clef-quest", version, about = "Read notes on the staff, pass levels, collect dolls")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the levels, grouped by clef
    Levels {
        /// Only show levels for this clef
        #[arg(long)]
        clef: Option<Clef>,
    },

    /// Draw one note on a staff
    Staff {
        clef: Clef,

        #[arg(allow_negative_numbers = true)]
        index: NoteIndex,

        /// Print SVG markup instead of the text drawing
        #[arg(long)]
        svg: bool,
    },

    /// Play a level interactively
    Play {
        level: u32,

        /// Seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Apply a magic edit to a picture with the image model
    Retouch {
        /// Source picture
        #[arg(long)]
        image: PathBuf,

        /// What to change
        #[arg(long)]
        prompt: String,

        /// Where to write the edited picture (defaults to `<image>.edited.<ext>`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
