pub mod archive;
pub mod domain;
pub mod gateway;
pub mod path;
pub mod ports;
pub mod publication;
pub mod session;
pub mod style;

pub use domain::{
    DomainError, FrontPage, GeneratedContent, ImagePayload, IssueStatus, NewsIssueDraft,
    PublicationType, SecondPage, Section, ThemeType, DEFAULT_SCALE,
};
pub use gateway::{ContentGateway, GatewayStatus, GenerationStep};
pub use path::{FieldPath, PathError, Segment};
pub use ports::{
    ContentGenerationService, ContentRequest, ImageRequest, IssueRepository, PortError, PortResult,
};
pub use publication::{editor_config, EditorConfig, EditorialProfile, Locale};
pub use session::{EditorSelection, EditorSession};
pub use style::{SectionStyle, SectionStyles};
