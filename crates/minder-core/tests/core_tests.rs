use minder_core::{EngineConfig, OpError};
use std::path::{Path, PathBuf};

#[test]
fn test_engine_config_builder_defaults() {
    let config = EngineConfig::builder().build().unwrap();
    assert!(config.preserve_symlinks);
    assert!(!config.fsync);
    assert_eq!(config.home_dir, dirs_home());
}

fn dirs_home() -> Option<PathBuf> {
    EngineConfig::default().home_dir
}

#[test]
fn test_engine_config_builder_overrides() {
    let config = EngineConfig::builder()
        .home_dir(Some(PathBuf::from("/home/tester")))
        .preserve_symlinks(false)
        .fsync(true)
        .build()
        .unwrap();

    assert_eq!(config.home(), Some(Path::new("/home/tester")));
    assert!(!config.preserve_symlinks);
    assert!(config.fsync);
}

#[test]
fn test_engine_config_equality() {
    let a = EngineConfig::with_home("/home/a");
    let b = EngineConfig::with_home("/home/a");
    let c = EngineConfig::with_home("/home/c");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_error_io_wraps_other_kinds_with_source() {
    use std::error::Error as _;

    let err = OpError::io(
        "/data/file",
        std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists"),
    );
    assert!(matches!(err, OpError::Io { .. }));
    assert!(err.source().is_some());
    assert!(err.to_string().starts_with("/data/file"));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        OpError::not_found("/nope").to_string(),
        "no such file or directory: /nope"
    );
    assert_eq!(
        OpError::NoMatches {
            pattern: "/tmp/*.x".into()
        }
        .to_string(),
        "no matches for \"/tmp/*.x\""
    );
    assert_eq!(
        OpError::not_a_directory("/tmp/f").to_string(),
        "target /tmp/f is not a directory"
    );
    assert_eq!(
        OpError::SelfContainment {
            from: "/a".into(),
            to: "/a/sub/a".into()
        }
        .to_string(),
        "destination is inside source: /a -> /a/sub/a"
    );
    assert_eq!(OpError::Aborted.to_string(), "operation aborted");
}

#[test]
fn test_cross_device_is_recognised() {
    let err = OpError::CrossDevice {
        from: "/mnt/a/x".into(),
        to: "/mnt/b/x".into(),
    };
    assert!(err.is_cross_device());
    assert!(!OpError::Aborted.is_cross_device());
}
