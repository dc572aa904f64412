use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::backend::BackendError;
use crate::MediaItem;

/// Public operations, named as they appear in failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AllMetadata,
    CatalogMetadata,
    OverlayMetadata,
    MultiPageInfo,
    PanoramaInfo,
    Iptc,
    Xmp,
    Date,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::AllMetadata,
        Operation::CatalogMetadata,
        Operation::OverlayMetadata,
        Operation::MultiPageInfo,
        Operation::PanoramaInfo,
        Operation::Iptc,
        Operation::Xmp,
        Operation::Date,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::AllMetadata => "all-metadata",
            Operation::CatalogMetadata => "catalog-metadata",
            Operation::OverlayMetadata => "overlay-metadata",
            Operation::MultiPageInfo => "multi-page-info",
            Operation::PanoramaInfo => "panorama-info",
            Operation::Iptc => "iptc",
            Operation::Xmp => "xmp",
            Operation::Date => "date",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| format!("unknown operation `{s}`"))
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{operation} failed because of missing arguments")]
    MissingArguments { operation: Operation },

    #[error("{operation} found nothing for mimeType={mime_type} uri={uri}")]
    Empty {
        operation: Operation,
        mime_type: String,
        uri: String,
    },

    #[error("unsupported field={field}")]
    UnsupportedField { operation: Operation, field: String },

    #[error("{operation} failed for mimeType={mime_type} uri={uri}: {source}")]
    Backend {
        operation: Operation,
        mime_type: String,
        uri: String,
        #[source]
        source: BackendError,
    },
}

pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    pub fn empty(operation: Operation, item: &MediaItem) -> Self {
        FetchError::Empty {
            operation,
            mime_type: item.mime_type.clone(),
            uri: item.uri.clone(),
        }
    }

    pub fn backend(operation: Operation, item: &MediaItem, source: BackendError) -> Self {
        FetchError::Backend {
            operation,
            mime_type: item.mime_type.clone(),
            uri: item.uri.clone(),
            source,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            FetchError::MissingArguments { operation }
            | FetchError::Empty { operation, .. }
            | FetchError::UnsupportedField { operation, .. }
            | FetchError::Backend { operation, .. } => *operation,
        }
    }

    /// Failure code namespaced by operation, e.g. `catalog-metadata-args`.
    pub fn code(&self) -> String {
        let suffix = match self {
            FetchError::MissingArguments { .. } => "args",
            FetchError::Empty {
                operation: Operation::AllMetadata,
                ..
            } => "failure",
            FetchError::Empty { .. } => "empty",
            FetchError::UnsupportedField { .. } => "field",
            FetchError::Backend {
                source: BackendError::Unavailable(_),
                ..
            } => "error",
            FetchError::Backend { .. } => "exception",
        };
        format!("{}-{suffix}", self.operation())
    }
}
