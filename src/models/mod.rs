pub mod evidence;
pub mod solve;

pub use evidence::{AttachmentKind, EvidenceBundle, ATTACHMENT_KINDS, DOWNLOAD_EXTENSIONS};
pub use solve::{AnswerValue, SolveRequest, SolveResult};
