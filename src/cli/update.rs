use super::{display_path, RepoArgs};
use debpool::core::{DebpoolError, DebpoolResult};
use debpool::repository::{Repository, UpdateReport};
use tokio::task::JoinSet;
use tracing::error;

pub async fn run(args: &RepoArgs, distribution: Option<String>) -> DebpoolResult<()> {
    let repo = args.open()?;

    let distributions = match distribution {
        Some(distribution) => vec![distribution],
        None => repo.config().distributions.clone(),
    };

    let reports = update_all(&repo, &distributions).await;

    let mut first_error = None;
    for (distribution, result) in reports {
        match result {
            Ok(report) => print_report(args, &report),
            Err(e) => {
                eprintln!("❌ {}: {}", distribution, e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Update every distribution on its own blocking worker.
///
/// Results come back in the order the distributions were given, regardless
/// of which worker finishes first.
pub async fn update_all(
    repo: &Repository,
    distributions: &[String],
) -> Vec<(String, DebpoolResult<UpdateReport>)> {
    let mut workers = JoinSet::new();
    for (position, distribution) in distributions.iter().enumerate() {
        let repo = repo.clone();
        let distribution = distribution.clone();
        workers.spawn_blocking(move || {
            let result = repo.update_indices(&distribution);
            (position, distribution, result)
        });
    }

    let mut results = Vec::with_capacity(distributions.len());
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => {
                error!(error = %e, "Update worker panicked");
                results.push((
                    usize::MAX,
                    String::from("<worker>"),
                    Err(DebpoolError::Path(format!("update worker failed: {}", e))),
                ));
            }
        }
    }

    results.sort_by_key(|(position, _, _)| *position);
    results
        .into_iter()
        .map(|(_, distribution, result)| (distribution, result))
        .collect()
}

fn print_report(args: &RepoArgs, report: &UpdateReport) {
    let packages: usize = report.indices.iter().map(|i| i.package_count).sum();
    println!(
        "✓ {}: {} index(es), {} package entries",
        report.distribution,
        report.indices.len(),
        packages
    );
    println!("  {}", display_path(&args.root, &report.release));
    println!("  {}", display_path(&args.root, &report.signatures.inline));
}
