//! End-to-end tests of the export pipeline through the library API.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tub_packager::bundler::notify::{ConsumerLauncher, SocketChannel};
use tub_packager::bundler::{
    BuildError, BundleKind, Error, MemoryBundleSource, NamedBundle, Notifier, NotifyOutcome,
    PackageContents, PackageDescriptor, Packager, RunDirective, SettingsBuilder,
};

fn descriptor() -> PackageDescriptor {
    PackageDescriptor {
        identifier: "harbor".into(),
        metadata_asset: Some("Assets/Missions/Harbor.asset".into()),
        scene_root: "Assets/Scenes/Harbor.unity".into(),
    }
}

fn packager(package: PackageDescriptor) -> Packager {
    let settings = SettingsBuilder::new()
        .package(package)
        .named_bundles(vec![
            NamedBundle::new("foo", vec!["Assets/Props/Crate.prefab".into()]),
            NamedBundle::new("bar", vec![]),
        ])
        .jobs(2)
        .build()
        .unwrap();
    Packager::new(settings)
}

fn full_source() -> Arc<MemoryBundleSource> {
    Arc::new(
        MemoryBundleSource::new()
            .with_bundle("foo", vec![0xf0u8; 100])
            .with_bundle("bar", vec![0xbau8; 4])
            .with_bundle("harbor.meta", vec![0x11u8; 10])
            .with_bundle("harbor.map", vec![0x22u8; 50]),
    )
}

/// Named bundles are built but only metadata and scene reach the file.
#[tokio::test]
async fn exports_metadata_and_scene_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("maps/harbor.tub");

    let exported = packager(descriptor())
        .export_to(full_source(), &path)
        .await
        .unwrap();

    assert_eq!(exported.header.meta_bundle.size, 10);
    assert_eq!(exported.header.scene_bundles.len(), 1);
    assert_eq!(exported.header.scene_bundles[0].size, 50);
    assert_eq!(exported.bundles.len(), 4);
    assert_eq!(exported.bundles[0].kind, BundleKind::Named);

    let contents = PackageContents::read(&path).await.unwrap();
    let file_len = std::fs::metadata(&path).unwrap().len();
    assert_eq!(file_len, exported.size);
    assert_eq!(file_len, contents.header_len() as u64 + 60);
    assert_eq!(contents.meta().as_ref(), &[0x11u8; 10][..]);
    assert_eq!(contents.scenes()[0].as_ref(), &[0x22u8; 50][..]);
}

/// Two exports of the same plan are byte-identical.
#[tokio::test]
async fn export_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.tub");
    let second = dir.path().join("second.tub");
    let packager = packager(descriptor());

    let a = packager.export_to(full_source(), &first).await.unwrap();
    let b = packager.export_to(full_source(), &second).await.unwrap();

    assert_eq!(a.checksum, b.checksum);
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

/// A package without a metadata asset is rejected before anything is built.
#[tokio::test]
async fn missing_metadata_leaves_destination_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("harbor.tub");
    std::fs::write(&path, b"previous package").unwrap();

    let mut package = descriptor();
    package.metadata_asset = None;

    let err = packager(package)
        .export_to(full_source(), &path)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }), "{err}");
    assert_eq!(std::fs::read(&path).unwrap(), b"previous package");
}

/// A failed bundle keeps the previous package in place.
#[tokio::test]
async fn build_failure_keeps_previous_package() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("harbor.tub");
    std::fs::write(&path, b"previous package").unwrap();

    let source = Arc::new(
        MemoryBundleSource::new()
            .with_bundle("foo", vec![1u8; 3])
            .with_bundle("bar", vec![2u8; 3])
            .with_bundle("harbor.meta", vec![3u8; 3]),
    );

    let err = packager(descriptor())
        .export_to(source, &path)
        .await
        .unwrap_err();

    match err {
        Error::Build { identifier, source } => {
            assert_eq!(identifier, "harbor.map");
            assert!(matches!(source, BuildError::Unknown));
        }
        other => panic!("expected build error, got {other}"),
    }
    assert_eq!(std::fs::read(&path).unwrap(), b"previous package");
}

/// Without a previous package, a failed export leaves nothing behind.
#[tokio::test]
async fn build_failure_without_previous_package_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("harbor.tub");

    let result = packager(descriptor())
        .export_to(Arc::new(MemoryBundleSource::new()), &path)
        .await;

    assert!(result.is_err());
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn export_requires_a_target() {
    let err = packager(descriptor())
        .export(full_source())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[derive(Default)]
struct RecordingLauncher {
    launched: Mutex<Vec<PathBuf>>,
}

impl ConsumerLauncher for &RecordingLauncher {
    fn launch(&self, directive: &RunDirective) -> tub_packager::bundler::Result<()> {
        self.launched
            .lock()
            .unwrap()
            .push(directive.path().to_path_buf());
        Ok(())
    }
}

/// Nobody listening: exactly one launch carrying the package path.
#[tokio::test]
async fn unreachable_consumer_is_launched_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("harbor.tub");
    let launcher = RecordingLauncher::default();
    let notifier = Notifier::new(
        SocketChannel::new(dir.path().join("nobody.sock"), Duration::from_millis(200)),
        &launcher,
    );

    let (exported, outcome) = packager(descriptor())
        .export_and_notify(full_source(), &path, &notifier)
        .await
        .unwrap();

    assert_eq!(outcome, NotifyOutcome::Spawned);
    let launched = launcher.launched.lock().unwrap();
    assert_eq!(launched.len(), 1);
    assert_eq!(
        launched[0],
        RunDirective::for_package(&exported.path).unwrap().path()
    );
}

/// A listening consumer receives the directive and nothing is launched.
#[cfg(unix)]
#[tokio::test]
async fn running_consumer_receives_directive() {
    use tokio::io::AsyncReadExt;
    use tokio::net::UnixListener;

    let dir = TempDir::new().unwrap();
    let endpoint = dir.path().join("tub.sock");
    let listener = UnixListener::bind(&endpoint).unwrap();
    let consumer = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = String::new();
        stream.read_to_string(&mut received).await.unwrap();
        received
    });

    let path = dir.path().join("harbor.tub");
    let launcher = RecordingLauncher::default();
    let notifier = Notifier::new(
        SocketChannel::new(&endpoint, Duration::from_secs(2)),
        &launcher,
    );

    let (exported, outcome) = packager(descriptor())
        .export_and_notify(full_source(), &path, &notifier)
        .await
        .unwrap();

    assert_eq!(outcome, NotifyOutcome::Delivered);
    assert!(launcher.launched.lock().unwrap().is_empty());

    let received = consumer.await.unwrap();
    let directive = RunDirective::parse(received.trim_end()).unwrap();
    assert_eq!(
        directive.path(),
        RunDirective::for_package(&exported.path)
            .unwrap()
            .path()
    );
}
