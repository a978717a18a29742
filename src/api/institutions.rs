//! Institutions, their course lists, and the XLSX import/export endpoints

use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::client::ApiClient;
use super::endpoints;
use super::error::ApiResult;
use super::service::{ResourceSpec, RestResource};
use crate::models::{Institution, InstitutionDraft};
use crate::state::filters::Paging;

pub static INSTITUTIONS: ResourceSpec = ResourceSpec {
    base_path: endpoints::institution::BASE,
    singular: "institution",
    plural: "institutions",
    server_keys: &[],
    paging: Paging::Display,
};

pub type Institutions = RestResource<Institution, InstitutionDraft>;

pub fn institutions(client: ApiClient) -> Institutions {
    RestResource::new(client, &INSTITUTIONS)
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCourse {
    pub course: String,
    pub commission: String,
}

/// Outcome of a spreadsheet import as reported by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub message: String,
    pub count: Option<u64>,
}

/// File name used for exports, e.g. `institutions-20240501-101500.xlsx`
pub fn export_file_name() -> String {
    format!("institutions-{}.xlsx", Local::now().format("%Y%m%d-%H%M%S"))
}

impl RestResource<Institution, InstitutionDraft> {
    pub async fn add_course(&self, id: &str, course: &NewCourse) -> ApiResult<Institution> {
        let updated: Institution = self
            .client()
            .post(&endpoints::institution::courses(id), course, "Failed to add course")
            .await?;
        info!("Added course '{}' to institution {}", course.course, id);
        Ok(updated)
    }

    pub async fn remove_course(&self, id: &str, index: usize) -> ApiResult<Institution> {
        let updated: Institution = self
            .client()
            .delete_returning(&endpoints::institution::course(id, index), "Failed to remove course")
            .await?;
        info!("Removed course #{} from institution {}", index, id);
        Ok(updated)
    }

    pub async fn export_xlsx(&self) -> ApiResult<Vec<u8>> {
        self.client()
            .download(endpoints::institution::EXPORT_XLSX, "Failed to export institutions")
            .await
    }

    /// Download the export and write it to `output`, or a timestamped file under `dir`.
    pub async fn export_to(&self, dir: &Path, output: Option<&Path>) -> ApiResult<PathBuf> {
        let bytes = self.export_xlsx().await?;
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => dir.join(export_file_name()),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &bytes)?;

        info!("Exported {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    pub async fn import_xlsx(&self, file: &Path) -> ApiResult<ImportSummary> {
        let bytes = std::fs::read(file)?;
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("institutions.xlsx");

        let envelope = self
            .client()
            .upload(
                endpoints::institution::IMPORT_XLSX,
                "file",
                file_name,
                bytes,
                "Failed to import institutions",
            )
            .await?;

        let summary = ImportSummary {
            message: envelope
                .message
                .unwrap_or_else(|| "Institutions imported successfully".to_string()),
            count: envelope.count,
        };
        info!("Imported {}: {}", file.display(), summary.message);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::api::service::ListSource;
    use crate::config::Config;
    use crate::state::filters::{FilterCriteria, FilterKey};

    #[test]
    fn test_institution_filters_stay_local() {
        let service = institutions(ApiClient::new(&Config::default()).unwrap());
        let criteria = FilterCriteria::new(15)
            .with(FilterKey::Country, "Australia")
            .with(FilterKey::Sector, "VET");
        assert!(service.query_for(&criteria).is_empty());
    }

    #[test]
    fn test_export_file_name() {
        let name = export_file_name();
        assert!(name.starts_with("institutions-"));
        assert!(name.ends_with(".xlsx"));
    }

    #[tokio::test]
    async fn test_import_missing_file_is_io_error() {
        let service = institutions(ApiClient::new(&Config::default()).unwrap());
        let dir = tempfile::TempDir::new().unwrap();
        let err = service
            .import_xlsx(&dir.path().join("missing.xlsx"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
    }
}
