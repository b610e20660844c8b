//! Container assembly.
//!
//! Materializes every bundle in a [`BundlePlan`] through a [`BundleSource`],
//! then frames the metadata and scene bundles behind a [`PackageHeader`].

use super::header::PackageHeader;
use crate::bundler::{BundleKind, BundlePlan, BundleSource, Error, PlanEntry, Result};
use bytes::{BufMut, Bytes, BytesMut};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Size of one materialized bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    /// Plan identifier
    pub identifier: String,
    /// Bundle role
    pub kind: BundleKind,
    /// Materialized byte length
    pub size: u64,
}

/// A complete package byte stream and what went into it.
#[derive(Debug, Clone)]
pub struct AssembledPackage {
    header: PackageHeader,
    data: Bytes,
    bundles: Vec<BundleReport>,
}

impl AssembledPackage {
    /// Header framed at the start of the stream.
    pub fn header(&self) -> &PackageHeader {
        &self.header
    }

    /// Full package bytes: header, metadata, scenes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Every materialized bundle in plan order, framed or not.
    pub fn bundles(&self) -> &[BundleReport] {
        &self.bundles
    }

    /// Consumes the package, returning its bytes.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

/// Builds every bundle in `plan` and frames the result.
///
/// At most `jobs` bundles are materialized at once. The first failure
/// aborts the remaining builds and the whole package.
pub async fn assemble<S>(plan: &BundlePlan, source: Arc<S>, jobs: usize) -> Result<AssembledPackage>
where
    S: BundleSource + Send + Sync + 'static,
{
    let timer = Instant::now();
    let bundles = materialize(plan, source, jobs).await?;
    log::info!(
        "Created {} bundles in {:.2} seconds",
        bundles.len(),
        timer.elapsed().as_secs_f64()
    );

    frame(plan, &bundles)
}

/// Materializes every plan entry, returning bytes in plan order.
pub async fn materialize<S>(plan: &BundlePlan, source: Arc<S>, jobs: usize) -> Result<Vec<Bytes>>
where
    S: BundleSource + Send + Sync + 'static,
{
    // More permits than entries never run more builds
    let permits = jobs.clamp(1, plan.len().max(1));
    let semaphore = Arc::new(Semaphore::new(permits));
    let mut tasks = JoinSet::new();

    for (index, entry) in plan.entries().iter().enumerate() {
        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);
        let identifier = entry.identifier().to_string();
        let source_paths = entry.source_paths().to_vec();

        tasks.spawn(async move {
            // The semaphore is never closed
            let _permit = semaphore.acquire_owned().await.ok();
            let result = source.build_bundle(&identifier, &source_paths).await;
            (index, identifier, result)
        });
    }

    let mut slots: Vec<Option<Bytes>> = vec![None; plan.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, identifier, result) = joined
            .map_err(|e| Error::GenericError(format!("Bundle build task panicked: {}", e)))?;

        // Returning here drops `tasks`, which aborts the builds still running
        let data = result.map_err(|source| Error::Build {
            identifier: identifier.clone(),
            source,
        })?;
        log::debug!("Materialized {} ({} bytes)", identifier, data.len());
        slots[index] = Some(data);
    }

    slots
        .into_iter()
        .zip(plan.entries())
        .map(|(slot, entry)| {
            slot.ok_or_else(|| {
                Error::GenericError(format!("No result for bundle `{}`", entry.identifier()))
            })
        })
        .collect()
}

/// Frames materialized bundles into a package stream.
///
/// `bundles` must hold one buffer per plan entry, in plan order. Only the
/// metadata and scene bundles are written; sizes are taken from the
/// buffers themselves.
pub fn frame(plan: &BundlePlan, bundles: &[Bytes]) -> Result<AssembledPackage> {
    if bundles.len() != plan.len() {
        crate::bail!(
            "Plan has {} bundles but {} were materialized",
            plan.len(),
            bundles.len()
        );
    }

    let entries: Vec<(&PlanEntry, &Bytes)> = plan.entries().iter().zip(bundles).collect();

    let meta = entries
        .iter()
        .find(|(entry, _)| entry.kind() == BundleKind::Meta)
        .map(|(_, data)| *data)
        .ok_or_else(|| Error::configuration("missing metadata reference"))?;
    let scenes: Vec<&Bytes> = entries
        .iter()
        .filter(|(entry, _)| entry.kind() == BundleKind::Scene)
        .map(|(_, data)| *data)
        .collect();

    let header = PackageHeader::new(
        meta.len() as u64,
        scenes.iter().map(|data| data.len() as u64),
    );
    let framed_header = header.to_framed_bytes()?;

    let body_len: usize = meta.len() + scenes.iter().map(|data| data.len()).sum::<usize>();
    let mut data = BytesMut::with_capacity(framed_header.len() + body_len);
    data.put_slice(&framed_header);
    data.put_slice(meta);
    for scene in &scenes {
        data.put_slice(scene);
    }
    debug_assert_eq!(header.body_len(), Some((data.len() - framed_header.len()) as u64));

    let bundles = entries
        .iter()
        .map(|(entry, data)| BundleReport {
            identifier: entry.identifier().to_string(),
            kind: entry.kind(),
            size: data.len() as u64,
        })
        .collect();

    Ok(AssembledPackage {
        header,
        data: data.freeze(),
        bundles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{BuildError, MemoryBundleSource, NamedBundle, PackageDescriptor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn plan_with(named: &[&str]) -> BundlePlan {
        let package = PackageDescriptor {
            identifier: "harbor".into(),
            metadata_asset: Some("Assets/Missions/Harbor.asset".into()),
            scene_root: "Assets/Scenes/Harbor.unity".into(),
        };
        let named: Vec<_> = named.iter().map(|n| NamedBundle::new(*n, vec![])).collect();
        BundlePlan::for_package(&package, &named).unwrap()
    }

    #[tokio::test]
    async fn header_declares_only_meta_and_scene() {
        let plan = plan_with(&["foo", "bar"]);
        let source = MemoryBundleSource::new()
            .with_bundle("foo", vec![0xf0u8; 100])
            .with_bundle("bar", vec![0xbau8; 4])
            .with_bundle("harbor.meta", vec![0x01u8; 10])
            .with_bundle("harbor.map", vec![0x02u8; 50]);

        let package = assemble(&plan, Arc::new(source), 2).await.unwrap();

        assert_eq!(package.header().meta_bundle.size, 10);
        let scene_sizes: Vec<u64> = package.header().scene_bundles.iter().map(|s| s.size).collect();
        assert_eq!(scene_sizes, [50]);

        let framed = package.header().to_framed_bytes().unwrap();
        assert_eq!(package.data().len(), framed.len() + 60);
        assert_eq!(&package.data()[..framed.len()], &framed[..]);
        assert!(package.data()[framed.len()..framed.len() + 10].iter().all(|b| *b == 0x01));
        assert!(package.data()[framed.len() + 10..].iter().all(|b| *b == 0x02));

        let reported: Vec<_> = package.bundles().iter().map(|b| (b.identifier.as_str(), b.size)).collect();
        assert_eq!(
            reported,
            [("foo", 100), ("bar", 4), ("harbor.meta", 10), ("harbor.map", 50)]
        );
    }

    #[tokio::test]
    async fn missing_bundle_aborts_with_identifier() {
        let plan = plan_with(&["foo"]);
        let source = MemoryBundleSource::new()
            .with_bundle("harbor.meta", vec![1u8])
            .with_bundle("harbor.map", vec![2u8]);

        match assemble(&plan, Arc::new(source), 4).await {
            Err(Error::Build { identifier, source }) => {
                assert_eq!(identifier, "foo");
                assert!(matches!(source, BuildError::Unknown));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Finishes bundles in reverse plan order and records peak parallelism.
    struct ReversingSource {
        delays: Vec<(String, u64)>,
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    impl BundleSource for ReversingSource {
        async fn build_bundle(
            &self,
            identifier: &str,
            _source_paths: &[String],
        ) -> std::result::Result<Bytes, BuildError> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay = self
                .delays
                .iter()
                .find(|(id, _)| id == identifier)
                .map(|(_, ms)| *ms)
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(Bytes::from(identifier.as_bytes().to_vec()))
        }
    }

    #[tokio::test]
    async fn results_are_reordered_to_plan_order() {
        let plan = BundlePlan::from_entries(vec![
            PlanEntry::new("m", BundleKind::Meta, vec![]),
            PlanEntry::new("s1", BundleKind::Scene, vec![]),
            PlanEntry::new("s2", BundleKind::Scene, vec![]),
            PlanEntry::new("s3", BundleKind::Scene, vec![]),
        ])
        .unwrap();
        let source = Arc::new(ReversingSource {
            delays: vec![
                ("m".into(), 60),
                ("s1".into(), 40),
                ("s2".into(), 20),
                ("s3".into(), 0),
            ],
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });

        let package = assemble(&plan, Arc::clone(&source), 2).await.unwrap();

        let framed = package.header().to_framed_bytes().unwrap();
        assert_eq!(&package.data()[framed.len()..], b"ms1s2s3");
        assert_eq!(package.header().scene_bundles.len(), 3);
        assert!(source.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn oversized_job_count_is_capped() {
        let plan = plan_with(&["foo"]);
        let source = MemoryBundleSource::new()
            .with_bundle("foo", vec![1u8; 3])
            .with_bundle("harbor.meta", vec![2u8; 4])
            .with_bundle("harbor.map", vec![3u8; 5]);

        let package = assemble(&plan, Arc::new(source), usize::MAX).await.unwrap();

        assert_eq!(package.header().meta_bundle.size, 4);
        assert_eq!(package.header().scene_bundles[0].size, 5);
    }

    #[test]
    fn frame_rejects_mismatched_bundle_count() {
        let plan = plan_with(&[]);
        assert!(frame(&plan, &[Bytes::from_static(b"only one")]).is_err());
    }
}
