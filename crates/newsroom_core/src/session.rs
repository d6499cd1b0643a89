//! crates/newsroom_core/src/session.rs
//!
//! The editor session: owns the preview issue, the selection and the cached
//! issue list of one publication, and sequences generation, field edits and
//! save/publish against the gateway and the issue store.
//!
//! No operation fails outward. Missing previews, empty inputs and collaborator
//! failures all degrade to a no-op, `None`, `false` or unchanged text, so losing
//! the provider never costs the operator an unsaved draft.
//!
//! Every replacement of the preview by a different draft advances a generation
//! epoch. The background image task started by `generate` captures the epoch
//! and only merges its image if the epoch is unchanged when it finishes.

use crate::archive;
use crate::domain::{
    GeneratedContent, ImagePayload, IssueStatus, NewsIssueDraft, PublicationType, ThemeType,
    DEFAULT_SCALE,
};
use crate::gateway::{ContentGateway, GatewayStatus};
use crate::path::{self, FieldPath};
use crate::ports::{ContentGenerationService, IssueRepository};
use crate::publication::{EditorConfig, Locale};
use crate::style::{SectionStyle, SectionStyles};
use bytes::Bytes;
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

//=========================================================================================
// Selection
//=========================================================================================

/// Which part of the preview the operator is editing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorSelection {
    pub selected_path: Option<FieldPath>,
    pub selected_label: String,
    /// Pending instruction for an AI rewrite of the selected text.
    pub rewrite_prompt: String,
}

impl EditorSelection {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

//=========================================================================================
// Session State
//=========================================================================================

struct EditorState {
    topic: String,
    date: NaiveDate,
    theme: Option<ThemeType>,
    locale: Locale,
    preview: Option<GeneratedContent>,
    epoch: u64,
    selection: EditorSelection,
    all_issues: Vec<GeneratedContent>,
    styles: SectionStyles,
    is_publishing: bool,
    is_saving: bool,
    is_rewriting: bool,
    loading_issues: bool,
}

impl EditorState {
    /// Installs a different logical draft.
    fn replace_preview(&mut self, content: GeneratedContent) {
        self.preview = Some(content);
        self.epoch += 1;
        self.selection.clear();
    }

    fn flag_mut(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::Publishing => &mut self.is_publishing,
            Flag::Saving => &mut self.is_saving,
            Flag::Rewriting => &mut self.is_rewriting,
            Flag::LoadingIssues => &mut self.loading_issues,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Flag {
    Publishing,
    Saving,
    Rewriting,
    LoadingIssues,
}

fn lock(state: &Mutex<EditorState>) -> MutexGuard<'_, EditorState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears its flag when dropped, so the flag never outlives the operation.
struct FlagGuard {
    state: Arc<Mutex<EditorState>>,
    flag: Flag,
}

impl FlagGuard {
    /// Raises `flag` on an already-locked state.
    fn raise(state: &Arc<Mutex<EditorState>>, locked: &mut EditorState, flag: Flag) -> Self {
        *locked.flag_mut(flag) = true;
        Self {
            state: Arc::clone(state),
            flag,
        }
    }
}

impl Drop for FlagGuard {
    fn drop(&mut self) {
        *lock(&self.state).flag_mut(self.flag) = false;
    }
}

//=========================================================================================
// The Session
//=========================================================================================

pub struct EditorSession {
    config: EditorConfig,
    gateway: ContentGateway,
    issues: Arc<dyn IssueRepository>,
    state: Arc<Mutex<EditorState>>,
    image_task: Mutex<Option<JoinHandle<()>>>,
}

impl EditorSession {
    pub fn new(
        publication: PublicationType,
        generator: Arc<dyn ContentGenerationService>,
        issues: Arc<dyn IssueRepository>,
    ) -> Self {
        Self::with_gateway(publication, ContentGateway::new(generator), issues)
    }

    pub fn with_gateway(
        publication: PublicationType,
        gateway: ContentGateway,
        issues: Arc<dyn IssueRepository>,
    ) -> Self {
        let config = publication.editor_config();
        let state = EditorState {
            topic: String::new(),
            date: Local::now().date_naive(),
            theme: None,
            locale: config.locale,
            preview: None,
            epoch: 0,
            selection: EditorSelection::default(),
            all_issues: Vec::new(),
            styles: SectionStyles::default(),
            is_publishing: false,
            is_saving: false,
            is_rewriting: false,
            loading_issues: false,
        };
        Self {
            config,
            gateway,
            issues,
            state: Arc::new(Mutex::new(state)),
            image_task: Mutex::new(None),
        }
    }

    /// Loads the issue list for the publication.
    pub async fn init(&self) {
        self.load_issue_list().await;
    }

    // --- Read Access ---

    pub fn publication(&self) -> PublicationType {
        self.config.publication
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn gateway_status(&self) -> GatewayStatus {
        self.gateway.status()
    }

    pub fn preview(&self) -> Option<GeneratedContent> {
        lock(&self.state).preview.clone()
    }

    pub fn selection(&self) -> EditorSelection {
        lock(&self.state).selection.clone()
    }

    pub fn all_issues(&self) -> Vec<GeneratedContent> {
        lock(&self.state).all_issues.clone()
    }

    pub fn topic(&self) -> String {
        lock(&self.state).topic.clone()
    }

    pub fn date(&self) -> NaiveDate {
        lock(&self.state).date
    }

    pub fn theme(&self) -> Option<ThemeType> {
        lock(&self.state).theme
    }

    pub fn locale(&self) -> Locale {
        lock(&self.state).locale
    }

    /// Identifies the current logical draft; changes whenever the preview is replaced.
    pub fn generation_epoch(&self) -> u64 {
        lock(&self.state).epoch
    }

    pub fn is_publishing(&self) -> bool {
        lock(&self.state).is_publishing
    }

    pub fn is_saving(&self) -> bool {
        lock(&self.state).is_saving
    }

    pub fn is_rewriting(&self) -> bool {
        lock(&self.state).is_rewriting
    }

    pub fn is_loading_issues(&self) -> bool {
        lock(&self.state).loading_issues
    }

    // --- Inputs ---

    pub fn set_topic(&self, topic: &str) {
        lock(&self.state).topic = topic.to_string();
    }

    pub fn set_date(&self, date: NaiveDate) {
        lock(&self.state).date = date;
    }

    pub fn set_theme(&self, theme: ThemeType) {
        lock(&self.state).theme = Some(theme);
    }

    pub fn set_locale(&self, locale: Locale) {
        lock(&self.state).locale = locale;
    }

    pub fn set_rewrite_prompt(&self, prompt: &str) {
        lock(&self.state).selection.rewrite_prompt = prompt.to_string();
    }

    // --- Drafts ---

    /// Replaces the preview with a blank template. No network or storage call.
    pub fn create_blank_template(&self, default_draft: NewsIssueDraft, default_theme: ThemeType) {
        let mut state = lock(&self.state);
        state.theme = Some(default_theme);
        state.replace_preview(GeneratedContent::new(
            default_draft,
            default_theme,
            self.config.publication,
        ));
        info!(publication = %self.config.publication, "Blank template loaded");
    }

    /// `create_blank_template` with the publication's own template, dated with the session date.
    pub fn create_blank_from_config(&self) {
        let date = self.date();
        self.create_blank_template(self.config.blank_template(date), self.config.default_theme);
    }

    /// Generates a new issue and makes it the preview.
    ///
    /// `theme` overrides the session theme; with neither set nothing happens.
    /// The main image is generated in the background and merged into the preview
    /// only if the preview still holds this draft when it arrives.
    pub async fn generate(
        &self,
        topic: &str,
        date: NaiveDate,
        theme: Option<ThemeType>,
    ) -> Option<NewsIssueDraft> {
        let theme = {
            let mut state = lock(&self.state);
            state.topic = topic.to_string();
            state.date = date;
            if theme.is_some() {
                state.theme = theme;
            }
            state.theme
        };
        let Some(theme) = theme else {
            warn!("Generation requested without a theme");
            return None;
        };
        let publication = self.config.publication;

        let text_data = self
            .gateway
            .generate_content(topic, date, theme, publication)
            .await?;

        let epoch = {
            let mut state = lock(&self.state);
            state.replace_preview(GeneratedContent::new(text_data.clone(), theme, publication));
            state.epoch
        };

        let gateway = self.gateway.clone();
        let state = Arc::clone(&self.state);
        let prompt = text_data.front_page.main_image_prompt.clone();
        let handle = tokio::spawn(async move {
            let Some(image) = gateway.generate_image(&prompt, theme, publication).await else {
                return;
            };
            let mut state = lock(&state);
            if state.epoch != epoch {
                debug!(epoch, current = state.epoch, "Discarding image for a replaced draft");
                return;
            }
            if let Some(preview) = state.preview.as_mut() {
                preview.image_base64 = Some(image.to_data_url());
            }
        });
        *self.image_task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        Some(text_data)
    }

    /// Waits for the background image task of the last `generate`, if any.
    pub async fn wait_for_image(&self) {
        let handle = self
            .image_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Background image task ended abnormally: {}", e);
            }
        }
    }

    /// Replaces the preview with an archived issue, adopting its theme and date.
    pub fn select_issue(&self, issue: GeneratedContent) {
        let mut state = lock(&self.state);
        state.theme = Some(issue.theme);
        match NaiveDate::parse_from_str(&issue.text_data.date, "%Y-%m-%d") {
            Ok(date) => state.date = date,
            Err(_) if issue.text_data.date.is_empty() => {}
            Err(e) => debug!(date = %issue.text_data.date, "Keeping session date: {}", e),
        }
        info!(id = ?issue.id, "Archived issue selected");
        state.replace_preview(issue);
    }

    // --- Persistence ---

    pub async fn publish(&self) -> bool {
        self.persist(IssueStatus::Published, Flag::Publishing).await
    }

    pub async fn save_draft(&self) -> bool {
        self.persist(IssueStatus::Draft, Flag::Saving).await
    }

    async fn persist(&self, status: IssueStatus, flag: Flag) -> bool {
        let (content, epoch, _guard) = {
            let mut state = lock(&self.state);
            let Some(preview) = state.preview.clone() else {
                return false;
            };
            if state.is_publishing || state.is_saving {
                warn!(?flag, "Save already in progress");
                return false;
            }
            let guard = FlagGuard::raise(&self.state, &mut state, flag);
            let content = GeneratedContent {
                status: Some(status),
                ..preview
            };
            (content, state.epoch, guard)
        };

        let saved = match self.issues.save(content).await {
            Ok(saved) => saved,
            Err(e) => {
                error!(?flag, "Failed to save issue: {}", e);
                return false;
            }
        };
        info!(id = ?saved.id, status = status.as_str(), "Issue saved");

        {
            let mut state = lock(&self.state);
            if state.epoch == epoch {
                let late_image = state.preview.as_ref().and_then(|p| p.image_base64.clone());
                let mut saved = saved;
                if saved.image_base64.is_none() {
                    saved.image_base64 = late_image;
                }
                state.preview = Some(saved);
            } else {
                debug!("Preview replaced while saving; keeping the newer draft");
            }
        }

        self.load_issue_list().await;
        true
    }

    /// Refreshes the cached issue list: this publication only, newest first.
    pub async fn load_issue_list(&self) {
        let _guard = {
            let mut state = lock(&self.state);
            FlagGuard::raise(&self.state, &mut state, Flag::LoadingIssues)
        };
        match self.issues.list().await {
            Ok(issues) => {
                let issues = archive::for_publication(issues, self.config.publication);
                debug!(count = issues.len(), "Issue list refreshed");
                lock(&self.state).all_issues = issues;
            }
            Err(e) => warn!("Failed to load issues: {}", e),
        }
    }

    // --- Selection and Field Access ---

    /// Selects the section at `path`; an empty path deselects.
    pub fn select_section(&self, path: &str, label: &str) {
        let mut state = lock(&self.state);
        if path.trim().is_empty() {
            state.selection = EditorSelection::default();
            return;
        }
        match FieldPath::parse(path) {
            Ok(parsed) => {
                state.selection = EditorSelection {
                    selected_path: Some(parsed),
                    selected_label: label.to_string(),
                    rewrite_prompt: String::new(),
                };
            }
            Err(e) => {
                warn!(path, "Ignoring selection of malformed path: {}", e);
                state.selection = EditorSelection::default();
            }
        }
    }

    /// The value at `path` in the preview text, or `""`.
    pub fn get_value(&self, path: &str) -> Value {
        let state = lock(&self.state);
        let (Some(preview), Ok(parsed)) = (state.preview.as_ref(), FieldPath::parse(path)) else {
            return Value::String(String::new());
        };
        path::get(&preview.text_data, &parsed)
    }

    /// Writes `value` at `path` (plus `field`, if given) in the preview text.
    pub fn update_field(&self, path: &str, field: Option<&str>, value: Value) -> bool {
        let target = match field {
            Some(field) => FieldPath::parse(path).and_then(|p| p.join(field)),
            None => FieldPath::parse(path),
        };
        let target = match target {
            Ok(target) => target,
            Err(e) => {
                warn!(path, ?field, "Ignoring update of malformed path: {}", e);
                return false;
            }
        };
        let mut state = lock(&self.state);
        let Some(preview) = state.preview.as_mut() else {
            return false;
        };
        path::set(&mut preview.text_data, &target, value)
    }

    /// The scale of the current selection, 1 when nothing is selected or set.
    pub fn get_scale(&self) -> f64 {
        let state = lock(&self.state);
        match (state.preview.as_ref(), state.selection.selected_path.as_ref()) {
            (Some(preview), Some(selected)) => path::get_scale(&preview.text_data, selected),
            _ => DEFAULT_SCALE,
        }
    }

    pub fn update_scale(&self, scale: f64) -> bool {
        let mut state = lock(&self.state);
        let Some(selected) = state.selection.selected_path.clone() else {
            return false;
        };
        let Some(preview) = state.preview.as_mut() else {
            return false;
        };
        path::update_scale(&mut preview.text_data, &selected, scale)
    }

    /// Rewrites `current_text` with the pending rewrite prompt. Returns the input
    /// unchanged when either is empty or the provider fails.
    pub async fn smart_rewrite(&self, current_text: &str) -> String {
        let (instruction, _guard) = {
            let mut state = lock(&self.state);
            let instruction = state.selection.rewrite_prompt.clone();
            if current_text.is_empty() || instruction.is_empty() {
                debug!("Rewrite skipped: missing text or instruction");
                return current_text.to_string();
            }
            let guard = FlagGuard::raise(&self.state, &mut state, Flag::Rewriting);
            (instruction, guard)
        };
        self.gateway.rewrite_text(current_text, &instruction).await
    }

    /// Sets the preview's image from an uploaded file, bypassing generation.
    pub fn upload_image(&self, file: Bytes, content_type: Option<&str>) -> bool {
        if file.is_empty() {
            return false;
        }
        let mut state = lock(&self.state);
        let Some(preview) = state.preview.as_mut() else {
            return false;
        };
        let image = ImagePayload::from_bytes(&file, content_type);
        info!(mime_type = %image.mime_type, bytes = file.len(), "Image uploaded");
        preview.image_base64 = Some(image.to_data_url());
        true
    }

    // --- Section Styles ---

    pub fn update_section_style(&self, section_id: &str, style: SectionStyle) {
        lock(&self.state).styles.update(section_id, style);
    }

    pub fn section_style(&self, section_id: &str) -> SectionStyle {
        lock(&self.state).styles.get(section_id)
    }

    pub fn reset_section_style(&self, section_id: &str) {
        lock(&self.state).styles.reset(section_id);
    }

    pub fn reset_all_styles(&self) {
        lock(&self.state).styles.reset_all();
    }

    /// Swaps in a whole saved style set, e.g. one restored with an issue.
    pub fn replace_styles(&self, styles: HashMap<String, SectionStyle>) {
        lock(&self.state).styles.replace_all(styles);
    }

    pub fn section_css_variables(&self, section_id: &str) -> Vec<(&'static str, String)> {
        lock(&self.state).styles.css_variables(section_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Section;
    use crate::gateway::tests::Unreachable;
    use crate::ports::{ContentRequest, ImageRequest, PortError, PortResult};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use tokio::sync::Notify;

    //-------------------------------------------------------------------------------------
    // Fakes
    //-------------------------------------------------------------------------------------

    /// Provider whose image call waits for `release` before answering.
    struct GatedProvider {
        release: Notify,
    }

    impl GatedProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                release: Notify::new(),
            })
        }
    }

    #[async_trait]
    impl ContentGenerationService for GatedProvider {
        async fn generate_issue(&self, request: &ContentRequest) -> PortResult<NewsIssueDraft> {
            let mut draft = request.publication.editor_config().blank_template(request.date);
            draft.front_page.headline = format!("News about {}", request.topic);
            draft.front_page.main_image_prompt = "a foggy harbour".to_string();
            Ok(draft)
        }

        async fn generate_image(&self, _: &ImageRequest) -> PortResult<Option<ImagePayload>> {
            self.release.notified().await;
            Ok(Some(ImagePayload::new("image/png", "iVBORw0KGgo=")))
        }

        async fn rewrite_text(&self, current_text: &str, instruction: &str) -> PortResult<String> {
            Ok(format!("{} ({})", current_text, instruction))
        }
    }

    #[derive(Default)]
    struct MemoryIssues {
        issues: Mutex<Vec<GeneratedContent>>,
    }

    impl MemoryIssues {
        fn snapshot(&self) -> Vec<GeneratedContent> {
            self.issues.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IssueRepository for MemoryIssues {
        async fn list(&self) -> PortResult<Vec<GeneratedContent>> {
            Ok(self.snapshot())
        }

        async fn save(&self, content: GeneratedContent) -> PortResult<GeneratedContent> {
            let mut issues = self.issues.lock().unwrap();
            Ok(archive::save_into(&mut issues, content, Utc::now()))
        }
    }

    /// Store whose `save` waits for `release` before writing.
    #[derive(Default)]
    struct GatedStore {
        inner: MemoryIssues,
        release: Notify,
    }

    #[async_trait]
    impl IssueRepository for GatedStore {
        async fn list(&self) -> PortResult<Vec<GeneratedContent>> {
            self.inner.list().await
        }

        async fn save(&self, content: GeneratedContent) -> PortResult<GeneratedContent> {
            self.release.notified().await;
            self.inner.save(content).await
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl IssueRepository for BrokenStore {
        async fn list(&self) -> PortResult<Vec<GeneratedContent>> {
            Err(PortError::Storage("disk unreadable".to_string()))
        }

        async fn save(&self, _: GeneratedContent) -> PortResult<GeneratedContent> {
            Err(PortError::Storage("disk full".to_string()))
        }
    }

    fn session_with(
        publication: PublicationType,
        provider: Arc<dyn ContentGenerationService>,
    ) -> (EditorSession, Arc<MemoryIssues>) {
        let store = Arc::new(MemoryIssues::default());
        let session = EditorSession::new(publication, provider, store.clone());
        (session, store)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 4).unwrap()
    }

    //-------------------------------------------------------------------------------------
    // Drafts and Generation
    //-------------------------------------------------------------------------------------

    #[test]
    fn blank_template_for_triangle() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        session.select_section("frontPage.headline", "Headline");

        session.create_blank_from_config();

        let preview = session.preview().unwrap();
        assert_eq!(preview.text_data.front_page.headline, "点击编辑标题");
        assert_eq!(preview.theme, ThemeType::ClassicRed);
        assert_eq!(preview.publication_type, PublicationType::Triangle);
        assert_eq!(session.theme(), Some(ThemeType::ClassicRed));
        assert_eq!(session.selection(), EditorSelection::default());
    }

    #[tokio::test]
    async fn generate_without_theme_does_nothing() {
        let (session, _) = session_with(PublicationType::Triangle, GatedProvider::new());
        assert!(session.generate("Mars", day(), None).await.is_none());
        assert!(session.preview().is_none());
    }

    #[tokio::test]
    async fn generated_image_merges_into_the_same_draft() {
        let provider = GatedProvider::new();
        let (session, _) = session_with(PublicationType::Duskvol, provider.clone());

        let text = session
            .generate("ghosts", day(), Some(ThemeType::Noir))
            .await
            .unwrap();
        assert_eq!(text.date, "2025-05-04");
        assert!(session.preview().unwrap().image_base64.is_none());

        provider.release.notify_one();
        session.wait_for_image().await;

        let image = session.preview().unwrap().image_base64.unwrap();
        assert_eq!(image, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn late_image_is_dropped_after_preview_replacement() {
        let provider = GatedProvider::new();
        let (session, _) = session_with(PublicationType::Triangle, provider.clone());

        session
            .generate("Mars", day(), Some(ThemeType::DeepBlue))
            .await
            .unwrap();
        session.create_blank_from_config();

        provider.release.notify_one();
        session.wait_for_image().await;

        let preview = session.preview().unwrap();
        assert_eq!(preview.text_data.front_page.headline, "点击编辑标题");
        assert!(preview.image_base64.is_none());
    }

    #[tokio::test]
    async fn failed_generation_keeps_previous_preview() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        session.create_blank_from_config();
        let before = session.preview();

        let result = session.generate("Mars", day(), Some(ThemeType::Emerald)).await;

        assert!(result.is_none());
        assert_eq!(session.preview(), before);
        assert!(session.gateway_status().error.is_some());
    }

    //-------------------------------------------------------------------------------------
    // Persistence
    //-------------------------------------------------------------------------------------

    #[tokio::test]
    async fn saving_twice_updates_one_record() {
        let (session, store) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        session.create_blank_from_config();

        assert!(session.save_draft().await);
        let first = session.preview().unwrap();
        assert!(first.id.is_some());
        assert_eq!(first.status, Some(IssueStatus::Draft));

        session.update_field("frontPage.headline", None, json!("Second pass"));
        assert!(session.save_draft().await);

        let stored = store.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, first.id);
        assert_eq!(stored[0].published_at, first.published_at);
        assert_eq!(stored[0].text_data.front_page.headline, "Second pass");
        assert!(!session.is_saving());
    }

    #[tokio::test]
    async fn overlapping_saves_write_one_record() {
        let store = Arc::new(GatedStore::default());
        let session = EditorSession::new(
            PublicationType::Triangle,
            Arc::new(Unreachable),
            store.clone(),
        );
        session.create_blank_from_config();

        let (first, second, ()) = tokio::join!(session.save_draft(), session.save_draft(), async {
            tokio::task::yield_now().await;
            store.release.notify_one();
        });

        assert!(first);
        assert!(!second);
        assert_eq!(store.inner.snapshot().len(), 1);
        assert!(session.preview().unwrap().id.is_some());
        assert!(!session.is_saving());
    }

    #[tokio::test]
    async fn publish_is_refused_while_saving() {
        let store = Arc::new(GatedStore::default());
        let session = EditorSession::new(
            PublicationType::Triangle,
            Arc::new(Unreachable),
            store.clone(),
        );
        session.create_blank_from_config();

        let (saved, published, ()) = tokio::join!(session.save_draft(), session.publish(), async {
            tokio::task::yield_now().await;
            store.release.notify_one();
        });

        assert!(saved);
        assert!(!published);
        let stored = store.inner.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, Some(IssueStatus::Draft));
        assert!(!session.is_saving() && !session.is_publishing());
    }

    #[tokio::test]
    async fn publish_marks_status_and_refreshes_list() {
        let (session, store) = session_with(PublicationType::Duskvol, Arc::new(Unreachable));
        store
            .save(GeneratedContent::new(
                NewsIssueDraft::default(),
                ThemeType::ClassicRed,
                PublicationType::Triangle,
            ))
            .await
            .unwrap();
        session.create_blank_from_config();

        assert!(session.publish().await);

        let preview = session.preview().unwrap();
        assert_eq!(preview.status, Some(IssueStatus::Published));
        let listed = session.all_issues();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, preview.id);
        assert!(!session.is_publishing());
    }

    #[tokio::test]
    async fn persisting_without_preview_or_store_reports_false() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        assert!(!session.save_draft().await);

        let broken = EditorSession::new(
            PublicationType::Triangle,
            Arc::new(Unreachable),
            Arc::new(BrokenStore),
        );
        broken.create_blank_from_config();
        let before = broken.preview();
        assert!(!broken.publish().await);
        assert_eq!(broken.preview(), before);
        assert!(!broken.is_publishing());
    }

    #[tokio::test]
    async fn select_issue_adopts_theme_and_date() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        let mut draft = NewsIssueDraft::default();
        draft.date = "2024-12-24".to_string();
        let issue = GeneratedContent::new(draft, ThemeType::Emerald, PublicationType::Triangle);
        session.select_section("frontPage.headline", "Headline");

        session.select_issue(issue.clone());

        assert_eq!(session.preview(), Some(issue));
        assert_eq!(session.theme(), Some(ThemeType::Emerald));
        assert_eq!(session.date(), NaiveDate::from_ymd_opt(2024, 12, 24).unwrap());
        assert!(session.selection().selected_path.is_none());
    }

    //-------------------------------------------------------------------------------------
    // Selection, Fields and Scale
    //-------------------------------------------------------------------------------------

    #[test]
    fn field_access_without_preview_is_inert() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        assert_eq!(session.get_value("frontPage.headline"), json!(""));
        assert!(!session.update_field("frontPage.headline", None, json!("x")));
        assert_eq!(session.get_scale(), 1.0);
    }

    #[test]
    fn update_field_with_separate_field_name() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        session.create_blank_from_config();

        assert!(session.update_field("frontPage.newsSnippets.0", Some("title"), json!("Flash")));
        assert_eq!(session.get_value("frontPage.newsSnippets.0.title"), json!("Flash"));
        assert!(!session.update_field("frontPage..title", None, json!("x")));
    }

    #[test]
    fn selecting_sections_resets_the_rewrite_prompt() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        session.select_section("frontPage.column1", "Column 1");
        session.set_rewrite_prompt("make it funnier");

        session.select_section("secondPage.editorial", "Editorial");
        let selection = session.selection();
        assert_eq!(selection.selected_label, "Editorial");
        assert_eq!(selection.rewrite_prompt, "");

        session.select_section("", "");
        assert!(session.selection().selected_path.is_none());
    }

    #[test]
    fn scale_follows_the_selection() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        session.create_blank_from_config();

        session.select_section("frontPage.column1", "Column 1");
        assert!(session.update_scale(2.0));
        assert_eq!(session.get_scale(), 2.0);

        session.select_section("frontPage.mainStory", "Main story");
        assert!(session.update_scale(3.0));
        assert_eq!(session.get_scale(), 3.0);
        assert_eq!(session.preview().unwrap().text_data.front_page.scale, Some(3.0));
    }

    //-------------------------------------------------------------------------------------
    // Rewrite, Upload and Styles
    //-------------------------------------------------------------------------------------

    #[tokio::test]
    async fn rewrite_needs_text_and_instruction() {
        let (session, _) = session_with(PublicationType::Triangle, GatedProvider::new());
        assert_eq!(session.smart_rewrite("text").await, "text");

        session.set_rewrite_prompt("shorter");
        assert_eq!(session.smart_rewrite("").await, "");
        assert_eq!(session.smart_rewrite("text").await, "text (shorter)");
        assert!(!session.is_rewriting());
    }

    #[tokio::test]
    async fn rewrite_with_failing_provider_returns_original() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        session.set_rewrite_prompt("shorter");

        assert_eq!(session.smart_rewrite("keep me").await, "keep me");
        assert!(!session.is_rewriting());
    }

    #[test]
    fn upload_sets_data_url_on_preview() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        let jpeg = Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xE0]);
        assert!(!session.upload_image(jpeg.clone(), None));

        session.create_blank_from_config();
        let epoch = session.generation_epoch();
        assert!(session.upload_image(jpeg, None));

        let image = session.preview().unwrap().image_base64.unwrap();
        assert!(image.starts_with("data:image/jpeg;base64,"));
        assert_eq!(session.generation_epoch(), epoch);
    }

    #[test]
    fn section_styles_belong_to_the_session() {
        let (first, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        let (second, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        first.update_section_style(
            "headline",
            SectionStyle {
                font_size: Some("3rem".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(first.section_css_variables("headline").len(), 1);
        assert!(second.section_css_variables("headline").is_empty());

        first.reset_all_styles();
        assert_eq!(first.section_style("headline"), SectionStyle::default());

        let restored = HashMap::from([(
            "editorial".to_string(),
            SectionStyle {
                line_height: Some("1.8".to_string()),
                ..Default::default()
            },
        )]);
        first.replace_styles(restored);
        assert_eq!(
            first.section_css_variables("editorial"),
            vec![("--section-line-height", "1.8".to_string())]
        );
        assert!(first.section_css_variables("headline").is_empty());
    }

    #[test]
    fn malformed_selection_clears_label_and_prompt() {
        let (session, _) = session_with(PublicationType::Triangle, Arc::new(Unreachable));
        session.create_blank_from_config();
        session.select_section("frontPage.headline", "Headline");
        session.set_rewrite_prompt("louder");

        session.select_section("frontPage..headline", "Broken");

        assert_eq!(session.selection(), EditorSelection::default());
    }

    #[test]
    fn locale_starts_from_publication_config() {
        let (session, _) = session_with(PublicationType::Duskvol, Arc::new(Unreachable));
        assert_eq!(session.locale(), Locale::En);
        session.set_locale(Locale::Zh);
        assert_eq!(session.locale(), Locale::Zh);
    }

    #[test]
    fn blank_template_sections_are_clickable() {
        let (session, _) = session_with(PublicationType::Adventurer, Arc::new(Unreachable));
        session.create_blank_template(
            NewsIssueDraft {
                front_page: crate::domain::FrontPage {
                    column1: Section::new("Bounty", "..."),
                    ..Default::default()
                },
                ..Default::default()
            },
            ThemeType::Parchment,
        );
        assert_eq!(session.get_value("frontPage.column1.title"), json!("Bounty"));
    }
}
