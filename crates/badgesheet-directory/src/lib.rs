pub mod assemble;
pub mod avatar;
pub mod error;
pub mod project;
pub mod resolve;
pub mod roster;
pub mod service;
pub mod slack;

pub use assemble::{
    assemble, assemble_with_report, AssemblyContext, AssemblyReport, SkipReason, SkippedEmail,
};
pub use avatar::AvatarDownloader;
pub use error::{DirectoryError, Result};
pub use project::{project, project_profile, ProjectedProfile};
pub use resolve::resolve_user_id;
pub use roster::{merge_must_include, read_roster, read_roster_file};
pub use service::{AvatarSource, DirectoryService};
pub use slack::SlackDirectory;
