//! Example: Load and display provider definitions from the provider-definitions directory.

use vinlens_provider::{FieldRule, ProviderLoader, ProviderRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading provider definitions from crates/vinlens-provider/provider-definitions/...\n");

    let loader = match ProviderLoader::with_default_dir() {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("\nMake sure you're running this from the workspace root!");
            return Err(Box::new(e));
        }
    };

    let registry = ProviderRegistry::load_from(&loader)?;

    println!(
        "✓ Successfully loaded {} provider definitions:\n",
        registry.len()
    );

    for provider in registry.list_providers() {
        println!("  • {} ({})", provider.display_name(), provider.name());
        println!("    Request: {} {}", provider.method(), provider.endpoint());

        if let Some(verified) = provider.provider.last_verified {
            println!("    Last verified: {}", verified);
        } else {
            println!("    ⚠ Never verified against live markup");
        }

        for rule in &provider.field_rules {
            match rule {
                FieldRule::ScalarByLabel { field, label } => {
                    println!("      {} <- label \"{}\"", field, label);
                }
                _ => println!(
                    "      {} <- {} {}",
                    rule.field(),
                    rule.kind(),
                    rule.selectors().join(" / ")
                ),
            }
        }
        println!();
    }

    Ok(())
}
