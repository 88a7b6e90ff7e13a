use super::{display_path, RepoArgs};
use debpool::core::DebpoolResult;
use std::path::Path;

pub fn run(
    args: &RepoArgs,
    package: &Path,
    distribution: &str,
    component: &str,
) -> DebpoolResult<()> {
    let repo = args.open()?;
    let root = &args.root;

    let outcome = repo.add_package(package, distribution, component)?;

    println!(
        "✓ Added {} to {}/{}",
        display_path(root, &outcome.stored),
        distribution,
        component
    );
    for index in &outcome.indices {
        println!(
            "  {} ({} package(s))",
            display_path(root, &index.packages),
            index.package_count
        );
    }
    println!("  {}", display_path(root, &outcome.release));
    println!("  {}", display_path(root, &outcome.release_signatures.inline));
    println!("  {}", display_path(root, &outcome.package_signature));
    Ok(())
}
