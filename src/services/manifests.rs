//! Manifest generation pipeline
//!
//! Shelf entries are processed one at a time. A failure for one entry is
//! logged and the batch moves on to the next.

use std::path::PathBuf;

use crate::{
    audit,
    error::{AppError, AppResult},
    models::{BibRecord, ShelfEntry},
    oclc::MetadataNormalizer,
    services::{
        cache::{write_json, JsonCache},
        dlcs::{prepare_manifest, ManifestSource},
        worldcat::BibliographicSource,
    },
};

/// Outcome of writing one manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
    /// No bibliographic record was found, nothing written
    Skipped,
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub created: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.created + self.overwritten
    }
}

pub struct ManifestPipeline<B, M> {
    bibs: B,
    manifests: M,
    cache: JsonCache,
    normalizer: MetadataNormalizer,
    output_dir: PathBuf,
}

impl<B, M> ManifestPipeline<B, M>
where
    B: BibliographicSource,
    M: ManifestSource,
{
    pub fn new(
        bibs: B,
        manifests: M,
        cache: JsonCache,
        normalizer: MetadataNormalizer,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bibs,
            manifests,
            cache,
            normalizer,
            output_dir: output_dir.into(),
        }
    }

    /// Write a manifest for every entry, in order
    pub async fn run(&mut self, entries: &[ShelfEntry]) -> AppResult<RunSummary> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut summary = RunSummary {
            total: entries.len(),
            ..Default::default()
        };

        for entry in entries {
            match self.process(entry).await {
                Ok(WriteOutcome::Created) => summary.created += 1,
                Ok(WriteOutcome::Overwritten) => summary.overwritten += 1,
                Ok(WriteOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    tracing::error!(
                        "Error: {} {}: {}",
                        entry.shelf_number,
                        entry.oclc_list(),
                        e
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Build and write the manifest of one shelf entry
    pub async fn process(&mut self, entry: &ShelfEntry) -> AppResult<WriteOutcome> {
        let mut manifest = self.manifests.fetch_manifest(&entry.dlcs_id).await?;

        let mut records = Vec::with_capacity(entry.oclc_numbers.len());
        for &oclc_number in &entry.oclc_numbers {
            if let Some(raw) = self.resolve(oclc_number).await? {
                records.push(BibRecord::from_json(raw)?);
            }
        }

        if records.is_empty() {
            tracing::warn!(
                "No bibliographic records for {} ({})",
                entry.shelf_number,
                entry.oclc_list()
            );
            return Ok(WriteOutcome::Skipped);
        }

        let title = records
            .iter()
            .flat_map(BibRecord::main_titles)
            .next()
            .map(String::from)
            .ok_or_else(|| AppError::MissingTitle(entry.shelf_number.clone()))?;

        let normalized = self.normalizer.normalize(&records, &entry.shelf_number);
        for anomaly in &normalized.anomalies {
            audit::record(anomaly);
        }

        prepare_manifest(&mut manifest, &title, &normalized.entries)?;

        let file_name = format!("{}.json", entry.output_stem());
        let path = self.output_dir.join(&file_name);
        let exists = tokio::fs::try_exists(&path).await?;
        write_json(&path, &manifest).await?;

        if exists {
            tracing::info!("Existing file {} was overwritten", file_name);
            Ok(WriteOutcome::Overwritten)
        } else {
            tracing::info!("File {} has been created successfully", file_name);
            Ok(WriteOutcome::Created)
        }
    }

    /// Cached record, or a fresh fetch written through to the cache
    async fn resolve(&mut self, oclc_number: u64) -> AppResult<Option<serde_json::Value>> {
        if self.cache.contains(oclc_number) {
            return self.cache.load(oclc_number).await.map(Some);
        }

        let fetched = self.bibs.fetch_bib(oclc_number).await?;
        if let Some(raw) = &fetched {
            self.cache.store(oclc_number, raw).await?;
        }
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{dlcs::MockManifestSource, worldcat::MockBibliographicSource};
    use mockall::predicate::eq;
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};

    const BASE: &str = "https://tudelft.on.worldcat.org/oclc/";

    fn entry(shelf: &str, dlcs: &str, oclc: Vec<u64>) -> ShelfEntry {
        ShelfEntry {
            shelf_number: shelf.to_string(),
            dlcs_id: dlcs.to_string(),
            oclc_numbers: oclc,
        }
    }

    fn skeleton() -> Value {
        json!({
            "id": "https://dlc.services/iiif-resource/7/x/abc",
            "type": "Manifest",
            "service": [{ "id": "legacy" }],
            "items": [{ "id": "canvas-1", "metadata": [{ "label": "old" }] }]
        })
    }

    async fn pipeline(
        bibs: MockBibliographicSource,
        manifests: MockManifestSource,
    ) -> (ManifestPipeline<MockBibliographicSource, MockManifestSource>, TempDir) {
        let temp_dir = tempdir().unwrap();
        let cache = JsonCache::open(temp_dir.path().join("cache")).await.unwrap();
        let pipeline = ManifestPipeline::new(
            bibs,
            manifests,
            cache,
            MetadataNormalizer::new(BASE),
            temp_dir.path().join("output"),
        );
        (pipeline, temp_dir)
    }

    fn read_json(path: PathBuf) -> Value {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_single_entry() {
        let mut bibs = MockBibliographicSource::new();
        bibs.expect_fetch_bib().with(eq(999)).times(1).returning(|_| {
            Ok(Some(json!({
                "identifier": { "oclcNumber": "999" },
                "title": { "mainTitles": [{ "text": "Foo" }] }
            })))
        });
        let mut manifests = MockManifestSource::new();
        manifests
            .expect_fetch_manifest()
            .withf(|id| id.to_string() == "abc")
            .times(1)
            .returning(|_| Ok(skeleton()));

        let (mut pipeline, temp_dir) = pipeline(bibs, manifests).await;
        let summary = pipeline.run(&[entry("ABC-123", "abc", vec![999])]).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.written(), 1);

        let written = read_json(temp_dir.path().join("output").join("abc-123.json"));
        assert_eq!(written["label"], json!({ "none": ["Foo"] }));
        let metadata = written["metadata"].as_array().unwrap();
        assert_eq!(metadata.len(), 9);
        assert_eq!(metadata[4]["label"]["en"], json!(["Format"]));
        assert_eq!(metadata[4]["value"]["none"], json!([""]));
        assert_eq!(metadata[8]["value"]["none"], json!(["ABC 123"]));
        assert!(written.get("service").is_none());
        assert!(written["items"][0].get("metadata").is_none());

        let cached = read_json(temp_dir.path().join("cache").join("999.json"));
        assert_eq!(cached["title"]["mainTitles"][0]["text"], "Foo");
    }

    #[tokio::test]
    async fn test_cached_record_is_not_fetched_and_output_is_stable() {
        let mut bibs = MockBibliographicSource::new();
        bibs.expect_fetch_bib().times(0);
        let mut manifests = MockManifestSource::new();
        manifests.expect_fetch_manifest().times(2).returning(|_| Ok(skeleton()));

        let (mut pipeline, temp_dir) = pipeline(bibs, manifests).await;
        pipeline
            .cache
            .store(
                42,
                &json!({
                    "identifier": { "oclcNumber": "42" },
                    "title": { "mainTitles": [{ "text": "Bar" }] },
                    "date": { "publicationDate": "19??" }
                }),
            )
            .await
            .unwrap();

        let shelf = entry("Tresorleeszaal", "abc", vec![42]);
        let path = temp_dir.path().join("output").join("tresorleeszaal-42.json");

        tokio::fs::create_dir_all(temp_dir.path().join("output")).await.unwrap();
        assert_eq!(pipeline.process(&shelf).await.unwrap(), WriteOutcome::Created);
        let first = std::fs::read(&path).unwrap();
        assert_eq!(pipeline.process(&shelf).await.unwrap(), WriteOutcome::Overwritten);
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_entry_does_not_stop_batch() {
        let mut bibs = MockBibliographicSource::new();
        bibs.expect_fetch_bib()
            .with(eq(1))
            .returning(|_| Err(AppError::Http("connection reset".to_string())));
        bibs.expect_fetch_bib().with(eq(2)).returning(|_| {
            Ok(Some(json!({ "title": { "mainTitles": [{ "text": "Two" }] } })))
        });
        bibs.expect_fetch_bib().with(eq(3)).returning(|_| Ok(None));
        let mut manifests = MockManifestSource::new();
        manifests.expect_fetch_manifest().returning(|_| Ok(skeleton()));

        let (mut pipeline, temp_dir) = pipeline(bibs, manifests).await;
        let summary = pipeline
            .run(&[
                entry("TR 1", "a", vec![1]),
                entry("TR 2", "b", vec![2]),
                entry("TR 3", "c", vec![3]),
            ])
            .await
            .unwrap();

        assert_eq!(
            summary,
            RunSummary {
                total: 3,
                created: 1,
                overwritten: 0,
                skipped: 1,
                failed: 1,
            }
        );
        assert!(temp_dir.path().join("output").join("tr-2.json").exists());
        assert!(!temp_dir.path().join("cache").join("3.json").exists());
    }

    #[tokio::test]
    async fn test_records_without_title_fail_the_entry() {
        let mut bibs = MockBibliographicSource::new();
        bibs.expect_fetch_bib()
            .returning(|_| Ok(Some(json!({ "identifier": { "oclcNumber": "5" } }))));
        let mut manifests = MockManifestSource::new();
        manifests.expect_fetch_manifest().returning(|_| Ok(skeleton()));

        let (mut pipeline, _temp_dir) = pipeline(bibs, manifests).await;
        let result = pipeline.process(&entry("TR 5", "e", vec![5])).await;

        assert!(matches!(result, Err(AppError::MissingTitle(shelf)) if shelf == "TR 5"));
    }

    #[tokio::test]
    async fn test_manifest_failure_skips_bib_lookup() {
        let mut bibs = MockBibliographicSource::new();
        bibs.expect_fetch_bib().times(0);
        let mut manifests = MockManifestSource::new();
        manifests
            .expect_fetch_manifest()
            .returning(|_| Err(AppError::Http("DLCS returned 404".to_string())));

        let (mut pipeline, _temp_dir) = pipeline(bibs, manifests).await;
        let summary = pipeline.run(&[entry("TR 6", "f", vec![6])]).await;

        tokio_test::assert_ok!(&summary);
        assert_eq!(summary.unwrap().failed, 1);
    }
}
