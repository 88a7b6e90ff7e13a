use super::RepoArgs;
use debpool::core::{DebpoolError, DebpoolResult};
use debpool::repository::release::DigestKind;

pub fn run(args: &RepoArgs, distribution: &str) -> DebpoolResult<()> {
    let repo = args.open()?;

    println!("Verifying Release for {}...", distribution);
    let mismatches = repo.verify(distribution)?;

    if mismatches.is_empty() {
        println!("✓ Every file listed in Release matches");
        return Ok(());
    }

    println!("❌ Verification failed");
    for mismatch in &mismatches {
        let kind = match mismatch.kind {
            DigestKind::Md5 => "MD5Sum",
            DigestKind::Sha256 => "SHA256",
        };
        match &mismatch.actual {
            Some(actual) => println!(
                "  ❌ {} ({}): expected {}, found {}",
                mismatch.path, kind, mismatch.expected, actual
            ),
            None => println!("  ❌ {} ({}): missing", mismatch.path, kind),
        }
    }

    Err(DebpoolError::VerificationFailed {
        distribution: distribution.to_string(),
        count: mismatches.len(),
    })
}
