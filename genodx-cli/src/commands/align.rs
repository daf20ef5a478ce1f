//! Align command implementation - ad hoc windowed scan of two sequences

use genodx_core::Aligner;

use crate::error::CliResult;

pub fn execute(target: &str, reference: &str) -> CliResult<()> {
    let aligner = Aligner::align(target, reference)?;
    let Some(best) = aligner.best_match() else {
        return Ok(());
    };

    println!("Target:     {}", aligner.target());
    println!("Window:     {}", aligner.best_window().unwrap_or_default());
    println!("Redacted:   {}", aligner.redacted());
    println!("Offset:     {}", best.offset);
    println!("Score:      {}", best.score);
    println!("Similarity: {}%", best.similarity);
    Ok(())
}
