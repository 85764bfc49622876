//! Kind-specific node configuration
//!
//! Each node kind carries its own typed configuration struct. Fields are
//! optional at decode time so that half-configured nodes coming from the
//! editor still load; completeness is reported through [`ConfigStatus`].

use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};

use crate::types::NodeKind;

/// Where a dataset loader reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    S3,
    Mongodb,
    Sql,
    Kafka,
    Kaggle,
}

/// Structured source descriptor for a dataset loader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceLocation {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub kind: Option<SourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetLoaderConfig {
    /// Shorthand source descriptor (file name, URI, connection string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    /// Structured source descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
    #[serde(
        skip_serializing_if = "serde_json::Map::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl DatasetLoaderConfig {
    /// Either the shorthand or the structured location is set
    pub fn has_source(&self) -> bool {
        is_filled(&self.data_source)
            || self
                .source
                .as_ref()
                .is_some_and(|s| is_filled(&s.location))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualInputConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub columns: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConnectorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub headers: BTreeMap<String, String>,
}

/// Cleaning and reshaping operations offered by transform nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformOperation {
    Filter,
    Clean,
    Deduplicate,
    FillMissing,
    Aggregate,
    Join,
    Sort,
    Rename,
    Cast,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformConfig {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub operation: Option<TransformOperation>,
    #[serde(
        skip_serializing_if = "serde_json::Map::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

/// Analysis jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisMethod {
    Classification,
    Regression,
    Clustering,
    FeatureEngineering,
    Statistics,
}

impl AnalysisMethod {
    /// Supervised methods need a target column
    pub fn is_supervised(&self) -> bool {
        matches!(self, Self::Classification | Self::Regression)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub method: Option<AnalysisMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_column: Option<String>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiModelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    Bar,
    Line,
    Scatter,
    Pie,
    Histogram,
    Heatmap,
    Table,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualizationConfig {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub chart_type: Option<ChartType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Parquet,
    Excel,
    Pdf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataExportConfig {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub format: Option<ExportFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Typed configuration of a node, one variant per [`NodeKind`]
///
/// Serializes as the bare `data` bag; the kind travels separately in the
/// node's `type` field, so decoding goes through [`NodeConfig::from_data`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeConfig {
    DatasetLoader(DatasetLoaderConfig),
    ManualInput(ManualInputConfig),
    ApiConnector(ApiConnectorConfig),
    Transform(TransformConfig),
    Analysis(AnalysisConfig),
    AiModel(AiModelConfig),
    Visualization(VisualizationConfig),
    DataExport(DataExportConfig),
    Output(OutputConfig),
}

impl NodeConfig {
    /// Empty configuration for a kind
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::DatasetLoader => Self::DatasetLoader(Default::default()),
            NodeKind::ManualInput => Self::ManualInput(Default::default()),
            NodeKind::ApiConnector => Self::ApiConnector(Default::default()),
            NodeKind::TransformNode => Self::Transform(Default::default()),
            NodeKind::Analysis => Self::Analysis(Default::default()),
            NodeKind::AiModel => Self::AiModel(Default::default()),
            NodeKind::Visualization => Self::Visualization(Default::default()),
            NodeKind::DataExport => Self::DataExport(Default::default()),
            NodeKind::Output => Self::Output(Default::default()),
        }
    }

    /// Decode the `data` bag of a node of the given kind
    ///
    /// A missing (`null`) bag decodes to the empty configuration.
    pub fn from_data(kind: NodeKind, data: serde_json::Value) -> Result<Self, serde_json::Error> {
        if data.is_null() {
            return Ok(Self::empty(kind));
        }

        Ok(match kind {
            NodeKind::DatasetLoader => Self::DatasetLoader(serde_json::from_value(data)?),
            NodeKind::ManualInput => Self::ManualInput(serde_json::from_value(data)?),
            NodeKind::ApiConnector => Self::ApiConnector(serde_json::from_value(data)?),
            NodeKind::TransformNode => Self::Transform(serde_json::from_value(data)?),
            NodeKind::Analysis => Self::Analysis(serde_json::from_value(data)?),
            NodeKind::AiModel => Self::AiModel(serde_json::from_value(data)?),
            NodeKind::Visualization => Self::Visualization(serde_json::from_value(data)?),
            NodeKind::DataExport => Self::DataExport(serde_json::from_value(data)?),
            NodeKind::Output => Self::Output(serde_json::from_value(data)?),
        })
    }

    /// Encode back into a `data` bag
    pub fn to_data(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::DatasetLoader(_) => NodeKind::DatasetLoader,
            Self::ManualInput(_) => NodeKind::ManualInput,
            Self::ApiConnector(_) => NodeKind::ApiConnector,
            Self::Transform(_) => NodeKind::TransformNode,
            Self::Analysis(_) => NodeKind::Analysis,
            Self::AiModel(_) => NodeKind::AiModel,
            Self::Visualization(_) => NodeKind::Visualization,
            Self::DataExport(_) => NodeKind::DataExport,
            Self::Output(_) => NodeKind::Output,
        }
    }

    /// Wire names of required fields that are missing or empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self {
            Self::DatasetLoader(cfg) => {
                if !cfg.has_source() {
                    missing.push("dataSource");
                }
            }
            Self::ManualInput(cfg) => {
                if cfg.columns.iter().all(|c| c.trim().is_empty()) {
                    missing.push("columns");
                }
            }
            Self::ApiConnector(cfg) => {
                if !is_filled(&cfg.url) {
                    missing.push("url");
                }
            }
            Self::Transform(cfg) => {
                if cfg.operation.is_none() {
                    missing.push("operation");
                }
            }
            Self::Analysis(cfg) => {
                match cfg.method {
                    None => missing.push("method"),
                    Some(method) if method.is_supervised() && !is_filled(&cfg.target_column) => {
                        missing.push("targetColumn")
                    }
                    Some(_) => {}
                }
            }
            Self::AiModel(cfg) => {
                if !is_filled(&cfg.model) {
                    missing.push("model");
                }
            }
            Self::Visualization(cfg) => {
                if cfg.chart_type.is_none() {
                    missing.push("chartType");
                }
                if !is_filled(&cfg.x_axis) {
                    missing.push("xAxis");
                }
            }
            Self::DataExport(cfg) => {
                if cfg.format.is_none() {
                    missing.push("format");
                }
            }
            Self::Output(_) => {}
        }
        missing
    }

    /// Configuration state of the node
    pub fn status(&self) -> ConfigStatus {
        let missing = self.missing_fields();
        let required = self.kind().required_fields();

        if missing.is_empty() {
            ConfigStatus::Ready
        } else if required.iter().all(|field| missing.contains(field)) {
            ConfigStatus::Unconfigured
        } else {
            ConfigStatus::Incomplete { missing }
        }
    }
}

/// How far along a node's configuration is
///
/// Nodes start `Unconfigured` when dropped on the canvas, move through
/// `Incomplete` as the form is filled, and are `Ready` once every required
/// field is present. Kinds without required fields are always `Ready`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ConfigStatus {
    Unconfigured,
    Incomplete { missing: Vec<&'static str> },
    Ready,
}

impl ConfigStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode an optional choice field, treating `null` and blank strings as unset
///
/// Unselected dropdowns arrive from the editor as `""`.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(D::Error::custom),
    }
}

fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}
