use super::{display_path, RepoArgs};
use debpool::core::DebpoolResult;

pub fn run(args: &RepoArgs) -> DebpoolResult<()> {
    let repo = args.open()?;
    let dest = repo.export_public_key()?;
    println!("✓ Public key exported to {}", display_path(&args.root, &dest));
    Ok(())
}
