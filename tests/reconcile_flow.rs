//! Grant/revoke reconciliation over a real vault.

use std::fs;

use tempfile::TempDir;

use denv::core::envfile::EnvDocument;
use denv::core::reconcile;
use denv::core::record::MetadataPatch;
use denv::core::source::{LocalVaultSource, SourceRegistry};
use denv::core::store::VaultStore;

struct Sandbox {
    tmp: TempDir,
    registry: SourceRegistry,
}

impl Sandbox {
    fn env_path(&self) -> std::path::PathBuf {
        self.tmp.path().join(".env")
    }
}

fn sandbox(credentials: &[(&str, &str)]) -> Sandbox {
    let tmp = TempDir::new().unwrap();
    let vault_dir = tmp.path().join(".denv");

    let store = VaultStore::new(&vault_dir);
    store.initialize().unwrap();
    for (name, value) in credentials {
        store.set(name, value, MetadataPatch::default()).unwrap();
    }

    let mut registry = SourceRegistry::new();
    registry.register(Box::new(LocalVaultSource::new(&vault_dir)));

    Sandbox { tmp, registry }
}

#[test]
fn test_grant_then_revoke_restores_empty_document() {
    let sb = sandbox(&[("API_KEY", "sk-test")]);
    let path = sb.env_path();

    let granted = reconcile::grant(&sb.registry, &["API_KEY".to_string()], &path, false).unwrap();
    assert_eq!(granted.granted, vec!["API_KEY"]);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "API_KEY=sk-test\n"
    );

    let revoked = reconcile::revoke(&["API_KEY".to_string()], &path).unwrap();
    assert_eq!(revoked.revoked, vec!["API_KEY"]);
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_unrelated_keys_are_preserved() {
    let sb = sandbox(&[("BAZ", "vault-value")]);
    let path = sb.env_path();
    fs::write(&path, "FOO=bar\n").unwrap();

    reconcile::grant(&sb.registry, &["BAZ".to_string()], &path, false).unwrap();

    let doc = EnvDocument::load(&path).unwrap();
    assert_eq!(doc.get("FOO"), Some("bar"));
    assert_eq!(doc.get("BAZ"), Some("vault-value"));

    reconcile::revoke(&["BAZ".to_string()], &path).unwrap();

    let doc = EnvDocument::load(&path).unwrap();
    assert_eq!(doc.get("FOO"), Some("bar"));
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_grant_overwrites_stale_value() {
    let sb = sandbox(&[("KEY", "fresh")]);
    let path = sb.env_path();
    fs::write(&path, "KEY=stale\n").unwrap();

    reconcile::grant(&sb.registry, &["KEY".to_string()], &path, false).unwrap();

    let doc = EnvDocument::load(&path).unwrap();
    assert_eq!(doc.get("KEY"), Some("fresh"));
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_granted_quoting_survives_reparse() {
    let sb = sandbox(&[("TRICKY", "a \"b\" c")]);
    let path = sb.env_path();

    reconcile::grant(&sb.registry, &["TRICKY".to_string()], &path, false).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert_eq!(raw, "TRICKY=\"a \\\"b\\\" c\"\n");

    let doc = EnvDocument::load(&path).unwrap();
    assert_eq!(doc.get("TRICKY"), Some("a \"b\" c"));
}

#[test]
fn test_backup_written_before_rewrite() {
    let sb = sandbox(&[("KEY", "new")]);
    let path = sb.env_path();
    fs::write(&path, "KEY=old\nOTHER=kept\n").unwrap();

    let outcome = reconcile::grant(&sb.registry, &["KEY".to_string()], &path, true).unwrap();

    let backup = outcome.backup.expect("backup path");
    assert_eq!(
        fs::read_to_string(&backup).unwrap(),
        "KEY=old\nOTHER=kept\n"
    );
    assert!(fs::read_to_string(&path).unwrap().contains("KEY=new"));
}

#[test]
fn test_no_backup_for_missing_document() {
    let sb = sandbox(&[("KEY", "v")]);
    let path = sb.env_path();

    let outcome = reconcile::grant(&sb.registry, &["KEY".to_string()], &path, true).unwrap();
    assert!(outcome.backup.is_none());
}

#[test]
fn test_grant_skips_unknown_names_silently() {
    let sb = sandbox(&[("PRESENT", "v")]);
    let path = sb.env_path();

    let outcome = reconcile::grant(
        &sb.registry,
        &["PRESENT".to_string(), "ABSENT".to_string()],
        &path,
        false,
    )
    .unwrap();

    assert_eq!(outcome.granted, vec!["PRESENT"]);
    assert_eq!(outcome.skipped, vec!["ABSENT"]);

    let doc = EnvDocument::load(&path).unwrap();
    assert!(doc.get("ABSENT").is_none());
}

#[test]
fn test_revoke_never_touches_vault() {
    let sb = sandbox(&[("KEY", "v")]);
    let path = sb.env_path();

    reconcile::grant(&sb.registry, &["KEY".to_string()], &path, false).unwrap();
    reconcile::revoke(&["KEY".to_string()], &path).unwrap();

    // Vault still resolves the credential after revocation.
    let credential = sb.registry.get("KEY").unwrap().unwrap();
    assert_eq!(credential.value, "v");
}
