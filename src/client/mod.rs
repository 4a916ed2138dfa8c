pub mod controller;
pub mod download;
pub mod transport;
pub mod upload;
pub mod view;

pub use controller::{
    FormState, SubmissionController, SubmissionEvent, SubmissionOutcome, SubmissionPhase,
};
pub use download::{DOCX_MIME_TYPE, DirectoryDownloader, DownloadLink, DownloadTrigger, data_uri};
pub use transport::{GenerationTransport, HttpTransport};
pub use upload::FileUpload;
