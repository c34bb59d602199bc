use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chatlog",
    about = "Render a chat transcript (JSON) to an HTML page"
)]
pub struct CliArgs {
    /// Transcript JSON file, or `-` for stdin
    #[arg(index = 1)]
    pub transcript: PathBuf,
    /// Write the page here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
    /// Show the pending indicator regardless of the transcript flag
    #[arg(long)]
    pub waiting: bool,
    #[arg(long, default_value = "Chat")]
    pub title: String,
}

impl CliArgs {
    pub fn reads_stdin(&self) -> bool {
        self.transcript.as_os_str() == "-"
    }
}
