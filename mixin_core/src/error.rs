use thiserror::Error;

#[derive(Error, Debug)]
pub enum MixinError {
    #[error("Unknown metric type: {0}")]
    UnknownMetricType(String),

    #[error("Missing required field '{field}' for metric type '{metric_type}'")]
    MissingField {
        metric_type: &'static str,
        field: &'static str,
    },

    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    #[error("Plugin contract violation: {0}")]
    ContractViolation(String),

    #[error("{product}/{sli_id}: {source}")]
    Sli {
        product: String,
        sli_id: String,
        #[source]
        source: Box<MixinError>,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MixinError {
    /// Attach the product/SLI that was being compiled when the error arose.
    pub fn for_sli(self, product: impl Into<String>, sli_id: impl Into<String>) -> Self {
        MixinError::Sli {
            product: product.into(),
            sli_id: sli_id.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MixinError>;
