use super::{display_path, RepoArgs};
use debpool::core::DebpoolResult;

pub fn run(args: &RepoArgs, component: Option<String>) -> DebpoolResult<()> {
    let config = args.load_config()?;
    let components = match component {
        Some(component) => {
            config.check_component(&component)?;
            vec![component]
        }
        None => config.components.clone(),
    };

    let repo = args.open()?;
    let mut total = 0;
    for component in &components {
        let packages = repo
            .pool()
            .list(component)?
            .collect::<DebpoolResult<Vec<_>>>()?;
        if packages.is_empty() {
            continue;
        }

        println!("{}:", component);
        for package in &packages {
            println!("  {}", display_path(&args.root, package));
        }
        total += packages.len();
    }

    if total == 0 {
        println!("No packages in pool.");
    } else {
        println!("\n{} package(s)", total);
    }
    Ok(())
}
