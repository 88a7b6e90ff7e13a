use super::RepoArgs;
use debpool::core::DebpoolResult;

pub fn run(args: &RepoArgs) -> DebpoolResult<()> {
    let repo = args.open()?;
    let key_id = &repo.config().signing.key_id;

    repo.check_key()?;
    println!("✓ Signing key {} is available", key_id);
    Ok(())
}
