use super::{DataStore, Snapshot, SnapshotRef};
use crate::catalog::{PaginationIndex, RecordStore};
use crate::error::{EpcatError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const CATALOG_FILENAME: &str = "catalog.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILENAME)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(EpcatError::Io)?;
        }
        Ok(())
    }
}

impl DataStore for FileStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        let data_file = self.catalog_path();
        if !data_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(data_file).map_err(EpcatError::Io)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let snapshot: Snapshot = serde_json::from_str(&content).map_err(EpcatError::Serialization)?;
        Ok(Some(snapshot))
    }

    fn save(&mut self, records: &RecordStore, pagination: &PaginationIndex) -> Result<()> {
        self.ensure_dir(&self.root)?;

        let content = serde_json::to_string_pretty(&SnapshotRef {
            records,
            pagination,
        })
        .map_err(EpcatError::Serialization)?;

        // Atomic replace: temp file, then rename over the catalog
        let tmp_file = self.root.join(format!(".catalog-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(EpcatError::Io)?;
        fs::rename(&tmp_file, self.catalog_path()).map_err(EpcatError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::catalog_page;
    use crate::model::Flag;

    #[test]
    fn load_without_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_directory_and_restores_flags_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let mut store = FileStore::new(root.clone());

        let mut records = RecordStore::new();
        let mut pagination = PaginationIndex::new();
        let (page, info) = catalog_page(2, 3, 7);
        let order: Vec<String> = page.iter().rev().map(|r| r.id.clone()).collect();
        records.merge(page);
        records.set_flag("5", Flag::Favorite, true).unwrap();
        pagination.record_page(2, order.clone(), info);
        pagination.set_current_page(2);

        store.save(&records, &pagination).unwrap();
        assert!(root.join(CATALOG_FILENAME).exists());

        let restored = FileStore::new(root).load().unwrap().unwrap();
        assert_eq!(restored.records, records);
        assert_eq!(restored.pagination.ids_for(2), order.as_slice());
        assert_eq!(restored.pagination.current_page, 2);
        assert!(restored.records.get("5").unwrap().favorite);
    }

    #[test]
    fn save_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());
        store.save(&RecordStore::new(), &PaginationIndex::new()).unwrap();
        store.save(&RecordStore::new(), &PaginationIndex::new()).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![CATALOG_FILENAME.to_string()]);
    }

    #[test]
    fn garbage_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CATALOG_FILENAME), "{ not json").unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert!(matches!(store.load(), Err(EpcatError::Serialization(_))));
    }

    #[test]
    fn empty_file_is_treated_as_first_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CATALOG_FILENAME), "").unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn partial_snapshot_takes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CATALOG_FILENAME),
            r#"{"records":{"1":{"id":"1","name":"Pilot","air_date":"December 2, 2013","code":"S01E01","favorite":true}}}"#,
        )
        .unwrap();
        let snapshot = FileStore::new(dir.path().to_path_buf()).load().unwrap().unwrap();
        assert!(snapshot.records.get("1").unwrap().favorite);
        assert_eq!(snapshot.pagination, PaginationIndex::new());
    }
}
