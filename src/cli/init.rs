use super::RepoArgs;
use debpool::core::DebpoolResult;

pub fn run(args: &RepoArgs) -> DebpoolResult<()> {
    let repo = args.open()?;
    let config = repo.config();

    println!("Initializing repository at {}", args.root.display());
    repo.init()?;

    println!("✓ Repository initialized");
    println!("  Distributions: {}", config.distributions.join(", "));
    println!("  Components:    {}", config.components.join(", "));
    println!("  Architectures: {}", config.architectures.join(", "));
    println!("  Public key:    {}", config.public_key_path.display());
    Ok(())
}
