pub mod policy;
pub mod reports;
pub mod runner;

pub use policy::PolicyKind;
pub use runner::{MissionRun, batch_seeds, run_batch};

/// Split a comma-separated argument, dropping blanks.
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}
