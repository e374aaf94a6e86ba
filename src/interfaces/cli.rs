use clap::Parser;

#[derive(Parser)]
#[command(name = "mintboard")]
#[command(about = "A terminal backer leaderboard for NFT crowdfunding campaigns on Base.")]
#[command(version)]
pub struct Cli {
    /// Refresh the board on an interval until interrupted
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Don't use cached results
    #[arg(short = 'n', long)]
    pub nocache: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Rows to display, 0 shows every backer
    #[arg(short = 'l', long, default_value_t = 20)]
    pub limit: usize,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Edit configuration file
    #[arg(long)]
    pub edit_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    /// Contract to aggregate (defaults to the configured campaign)
    pub contract: Option<String>,
}
