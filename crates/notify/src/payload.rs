//! JSON body of a data-load request.

use dataload_core::S3Location;
use serde::Serialize;

const CONNECTOR_TYPE: &str = "FILE_UPLOAD";
const CONTENT_TYPE: &str = "athena";

/// Identifiers describing the dataset the files are loaded into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetContext {
    pub dataset_id: String,
    pub metadata_id: String,
    pub datasource_id: String,
    pub app_id: String,
    pub connector_id: String,
    pub connector_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataloadRequest {
    pub dataset_id: String,
    pub metadata_id: String,
    pub datasources: Vec<Datasource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    pub datasource_id: String,
    pub index_name: String,
    pub data_connection: DataConnection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConnection {
    #[serde(rename = "appid")]
    pub app_id: String,
    #[serde(rename = "connectorid")]
    pub connector_id: String,
    pub connector_type: String,
    pub name: String,
    pub s3_bucket: String,
    pub s3_path: String,
    pub content_type: String,
}

impl DataloadRequest {
    /// A request with a single file-upload datasource pointing at `location`.
    /// The metadata id doubles as the index name.
    pub fn for_location(dataset: &DatasetContext, location: &S3Location) -> Self {
        Self {
            dataset_id: dataset.dataset_id.clone(),
            metadata_id: dataset.metadata_id.clone(),
            datasources: vec![Datasource {
                datasource_id: dataset.datasource_id.clone(),
                index_name: dataset.metadata_id.clone(),
                data_connection: DataConnection {
                    app_id: dataset.app_id.clone(),
                    connector_id: dataset.connector_id.clone(),
                    connector_type: CONNECTOR_TYPE.to_string(),
                    name: dataset.connector_name.clone(),
                    s3_bucket: location.bucket.clone(),
                    s3_path: location.path.clone(),
                    content_type: CONTENT_TYPE.to_string(),
                },
            }],
        }
    }
}
