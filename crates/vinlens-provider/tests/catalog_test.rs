use std::path::PathBuf;
use vinlens_provider::{ProviderLoader, ProviderRegistry};

fn workspace_definitions_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("provider-definitions")
}

#[test]
fn test_shipped_definitions_are_valid() {
    let loader = ProviderLoader::new(workspace_definitions_dir()).expect("definitions dir exists");
    let registry = ProviderRegistry::load_from(&loader).expect("load shipped definitions");

    assert!(!registry.is_empty());
    for provider in registry.list_providers() {
        assert!(provider.validate().is_ok(), "{} is invalid", provider.name());
    }
}

#[test]
fn test_builtin_matches_shipped_definitions() {
    let loader = ProviderLoader::new(workspace_definitions_dir()).expect("definitions dir exists");
    let from_disk = ProviderRegistry::load_from(&loader).expect("load shipped definitions");
    let builtin = ProviderRegistry::builtin().expect("load builtin catalog");

    for provider in builtin.list_providers() {
        let on_disk = from_disk
            .get(provider.name())
            .expect("builtin provider is shipped on disk");
        assert_eq!(on_disk, provider);
    }
}

#[test]
fn test_default_dir_finds_shipped_definitions() {
    let loader = ProviderLoader::with_default_dir().expect("default definitions dir");
    assert_eq!(
        loader.definitions_dir().canonicalize().expect("dir exists"),
        workspace_definitions_dir().canonicalize().expect("dir exists")
    );

    let registry = ProviderRegistry::load_from(&loader).expect("load shipped definitions");
    assert!(registry.get("vindecoderz").is_ok());
}
