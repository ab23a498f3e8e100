use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    BadBackendUrl(String),
    NotInRange(String),
    MissingValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::BadBackendUrl(e) => write!(f, "Backend URL error: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
            ConfigError::MissingValue(e) => write!(f, "Missing value: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug)]
pub enum StorageError {
    ReadFailed(String),
    WriteFailed(String),
    CorruptRecord(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ReadFailed(e) => write!(f, "Storage read failed: {}", e),
            StorageError::WriteFailed(e) => write!(f, "Storage write failed: {}", e),
            StorageError::CorruptRecord(e) => write!(f, "Stored image record is corrupt: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

/// Errors raised by the image collection itself, before or while persisting.
#[derive(Debug)]
pub enum StoreError {
    CapacityReached(usize),
    DuplicateId(String),
    NotFound(String),
    Storage(StorageError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::CapacityReached(max) => {
                write!(f, "The collection already holds the maximum of {} images", max)
            }
            StoreError::DuplicateId(id) => write!(f, "An image with id {} already exists", id),
            StoreError::NotFound(id) => write!(f, "No image with id {}", id),
            StoreError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::Storage(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The request never produced an HTTP reply (connection, timeout, TLS).
    Transport(String),
    /// Non-2xx reply; `message` is the backend's own error text when it sent one.
    Status { status: u16, message: String },
    /// 2xx reply with `success: false`.
    Rejected(String),
    MalformedReply(String),
    InitializationFailed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(e) => write!(f, "Backend unreachable: {}", e),
            BackendError::Status { status, message } => {
                write!(f, "Backend returned {}: {}", status, message)
            }
            BackendError::Rejected(e) => write!(f, "{}", e),
            BackendError::MalformedReply(e) => write!(f, "Malformed backend reply: {}", e),
            BackendError::InitializationFailed(e) => {
                write!(f, "Backend client initialization failed: {}", e)
            }
        }
    }
}

impl std::error::Error for BackendError {}

#[derive(Debug, Clone, PartialEq)]
pub enum OcrError {
    Backend(BackendError),
    EngineUnavailable(String),
    EngineFailed(String),
    DownloadFailed(String),
    NoText,
}

impl fmt::Display for OcrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcrError::Backend(e) => write!(f, "{}", e),
            OcrError::EngineUnavailable(e) => write!(f, "OCR engine unavailable: {}", e),
            OcrError::EngineFailed(e) => write!(f, "OCR engine failed: {}", e),
            OcrError::DownloadFailed(e) => write!(f, "Image download failed: {}", e),
            OcrError::NoText => write!(f, "No text could be extracted from the image"),
        }
    }
}

impl std::error::Error for OcrError {}

impl From<BackendError> for OcrError {
    fn from(err: BackendError) -> Self {
        OcrError::Backend(err)
    }
}

#[derive(Debug)]
pub enum FlowError {
    EmptyUrl,
    CapacityReached(usize),
    Busy,
    NothingToAnalyze,
    NotFound(String),
    Acquisition(BackendError),
    Store(StoreError),
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::EmptyUrl => write!(f, "Please enter a URL"),
            FlowError::CapacityReached(max) => {
                write!(f, "You have reached the limit of {} images", max)
            }
            FlowError::Busy => write!(f, "Another operation is already running"),
            FlowError::NothingToAnalyze => write!(f, "There is no extracted text to analyze"),
            FlowError::NotFound(id) => write!(f, "No image with id {}", id),
            FlowError::Acquisition(e) => write!(f, "Could not acquire the image: {}", e),
            FlowError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FlowError {}

impl From<StoreError> for FlowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CapacityReached(max) => FlowError::CapacityReached(max),
            StoreError::NotFound(id) => FlowError::NotFound(id),
            other => FlowError::Store(other),
        }
    }
}

impl From<StorageError> for FlowError {
    fn from(err: StorageError) -> Self {
        FlowError::Store(StoreError::Storage(err))
    }
}

#[derive(Debug)]
pub enum ControllerError {
    StorageError(StorageError),
    BackendError(BackendError),
    InitializationFailed(String),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::StorageError(e) => write!(f, "Storage error: {}", e),
            ControllerError::BackendError(e) => write!(f, "Backend error: {}", e),
            ControllerError::InitializationFailed(e) => write!(f, "Initialization failed: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<StorageError> for ControllerError {
    fn from(err: StorageError) -> Self {
        ControllerError::StorageError(err)
    }
}

impl From<BackendError> for ControllerError {
    fn from(err: BackendError) -> Self {
        ControllerError::BackendError(err)
    }
}
