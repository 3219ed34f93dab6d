use anyhow::Result;
use tracing::info;

use crate::cli::UpdateArgs;
use crate::scorer::{ProcessScorer, Scorer};

pub fn run(args: UpdateArgs) -> Result<()> {
    let scorer = ProcessScorer::new(args.scorer_command, args.result_path);
    scorer.refresh_corpus()?;

    info!("scorer corpus refreshed");
    Ok(())
}
