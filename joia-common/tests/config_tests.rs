//! Tests for root folder resolution and first-start initialization
//!
//! Note: Uses serial_test to prevent ENV variable race conditions. Tests
//! that manipulate JOIA_ROOT_FOLDER or JOIA_ROOT are marked with #[serial]
//! so they run sequentially, not in parallel.

use joia_common::config::{
    get_default_root_folder, RootFolderInitializer, RootFolderResolver, DATABASE_FILE_NAME,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var("JOIA_ROOT_FOLDER");
    env::remove_var("JOIA_ROOT");

    let resolver = RootFolderResolver::new("test-module");
    let root_folder = resolver.resolve();

    assert!(!root_folder.as_os_str().is_empty());
    // No config file manipulation here, so the compiled default applies
    // unless the developer machine has one; both resolve non-empty.
    let default = get_default_root_folder();
    assert!(!default.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_resolver_env_var_joia_root_folder() {
    let test_path = "/tmp/joia-test-env-folder";
    env::set_var("JOIA_ROOT_FOLDER", test_path);

    let resolver = RootFolderResolver::new("test-module");
    let root_folder = resolver.resolve();

    assert_eq!(root_folder, PathBuf::from(test_path));

    env::remove_var("JOIA_ROOT_FOLDER");
}

#[test]
#[serial]
fn test_resolver_joia_root_folder_takes_precedence() {
    env::remove_var("JOIA_ROOT_FOLDER");
    env::remove_var("JOIA_ROOT");

    env::set_var("JOIA_ROOT_FOLDER", "/tmp/joia-priority-1");
    env::set_var("JOIA_ROOT", "/tmp/joia-priority-2");

    let resolver = RootFolderResolver::new("test-module");
    let root_folder = resolver.resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/joia-priority-1"));

    env::remove_var("JOIA_ROOT_FOLDER");
    env::remove_var("JOIA_ROOT");
}

#[test]
#[serial]
fn test_resolver_falls_back_to_joia_root() {
    env::remove_var("JOIA_ROOT_FOLDER");
    env::set_var("JOIA_ROOT", "/tmp/joia-test-env-root");

    let resolver = RootFolderResolver::new("test-module");
    let root_folder = resolver.resolve();

    assert_eq!(root_folder, PathBuf::from("/tmp/joia-test-env-root"));

    env::remove_var("JOIA_ROOT");
}

#[test]
#[serial]
fn test_resolver_ignores_empty_env_value() {
    env::set_var("JOIA_ROOT_FOLDER", "  ");
    env::remove_var("JOIA_ROOT");

    let resolver = RootFolderResolver::new("test-module");
    let root_folder = resolver.resolve();

    assert_ne!(root_folder, PathBuf::from("  "));

    env::remove_var("JOIA_ROOT_FOLDER");
}

#[test]
fn test_initializer_creates_directory_and_database_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("joia-root");

    let initializer = RootFolderInitializer::new(root.clone());
    assert!(!root.exists());

    initializer
        .ensure_directory_exists()
        .expect("should create root folder");
    assert!(root.is_dir());

    // Idempotent on an existing directory
    initializer
        .ensure_directory_exists()
        .expect("existing root folder is fine");

    assert_eq!(initializer.database_path(), root.join(DATABASE_FILE_NAME));
}
