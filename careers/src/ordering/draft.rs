//! Client-side draft of a company's section order.
//!
//! A [`SectionDraft`] keeps the last confirmed owner listing apart from a working copy. Moves only
//! touch the working copy, so a UI can render them immediately. [`SectionDraft::commit`] publishes
//! the working order as one reorder guarded by the confirmed `sections_version`, then replaces both
//! copies with a fresh server read. A rejected reorder puts the working copy back to the confirmed
//! order. If the reorder lands but the fresh read fails, the draft keeps the committed order and
//! refuses further commits until [`SectionDraft::reload`] succeeds.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::client::{ClientError, OwnerListing, SectionsApi};
use super::{OrderingError, assign_positions, move_item};
use crate::api::models::sections::{ReorderRequest, ReorderResponse, SectionResponse};
use crate::types::{CompanyId, SectionId};

#[derive(Debug, Error)]
pub enum DraftError {
    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Draft must be reloaded before committing again")]
    NeedsReload,
}

#[derive(Debug, Clone)]
pub struct SectionDraft {
    company_id: CompanyId,
    confirmed: Vec<SectionResponse>,
    version: i64,
    working: Vec<SectionResponse>,
    needs_reload: bool,
}

impl SectionDraft {
    /// Start from a listing already read from the server.
    pub fn new(company_id: CompanyId, listing: OwnerListing) -> Self {
        Self {
            company_id,
            working: listing.sections.clone(),
            confirmed: listing.sections,
            version: listing.version,
            needs_reload: false,
        }
    }

    /// Read the owner listing and start a clean draft from it.
    pub async fn load<A: SectionsApi + ?Sized>(api: &A, company_id: CompanyId) -> Result<Self, DraftError> {
        let listing = api.list_owner_sections(company_id).await?;
        Ok(Self::new(company_id, listing))
    }

    /// Working order, including uncommitted moves.
    pub fn sections(&self) -> &[SectionResponse] {
        &self.working
    }

    /// Order as last confirmed by the server.
    pub fn confirmed(&self) -> &[SectionResponse] {
        &self.confirmed
    }

    /// `sections_version` the confirmed order was read at.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn move_section(&mut self, from: usize, to: usize) -> Result<(), DraftError> {
        move_item(&mut self.working, from, to)?;
        Ok(())
    }

    pub fn move_section_by_id(&mut self, id: SectionId, to: usize) -> Result<(), DraftError> {
        let from = self
            .working
            .iter()
            .position(|section| section.id == id)
            .ok_or(OrderingError::UnknownSection(id))?;
        self.move_section(from, to)
    }

    /// Set when a commit was applied but could not be read back.
    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    /// Replace the draft with a fresh owner listing, dropping uncommitted moves.
    pub async fn reload<A: SectionsApi + ?Sized>(&mut self, api: &A) -> Result<(), DraftError> {
        let listing = api.list_owner_sections(self.company_id).await?;
        *self = Self::new(self.company_id, listing);
        Ok(())
    }

    /// Whether the working order differs from the confirmed order.
    pub fn is_dirty(&self) -> bool {
        !self.working.iter().map(|s| s.id).eq(self.confirmed.iter().map(|s| s.id))
    }

    /// The commit payload: every working section numbered by position, guarded by the confirmed
    /// version.
    pub fn reorder_request(&self) -> Result<ReorderRequest, DraftError> {
        Ok(ReorderRequest {
            sections: assign_positions(self.working.iter().map(|s| s.id))?,
            expected_version: Some(self.version),
        })
    }

    /// Drop uncommitted moves.
    pub fn rollback(&mut self) {
        self.working = self.confirmed.clone();
    }

    /// Publish the working order and reconcile with the server.
    ///
    /// Returns `Ok(None)` without calling the API when there is nothing to commit.
    #[instrument(skip(self, api), fields(company_id = %self.company_id, version = self.version), err)]
    pub async fn commit<A: SectionsApi + ?Sized>(&mut self, api: &A) -> Result<Option<ReorderResponse>, DraftError> {
        if self.needs_reload {
            return Err(DraftError::NeedsReload);
        }
        if !self.is_dirty() {
            debug!("Draft is clean, nothing to commit");
            return Ok(None);
        }

        let response = match self.publish(api).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Commit failed, restoring confirmed order: {}", e);
                self.rollback();
                return Err(e);
            }
        };

        match api.list_owner_sections(self.company_id).await {
            Ok(listing) => {
                self.working = listing.sections.clone();
                self.confirmed = listing.sections;
                self.version = listing.version;
                Ok(Some(response))
            }
            Err(e) => {
                // The server holds the working order now; the confirmed copy is stale
                warn!(version = response.version, "Commit applied but re-read failed, reload required: {}", e);
                self.confirmed = self.working.clone();
                self.version = response.version;
                self.needs_reload = true;
                Err(e.into())
            }
        }
    }

    async fn publish<A: SectionsApi + ?Sized>(&self, api: &A) -> Result<ReorderResponse, DraftError> {
        let request = self.reorder_request()?;
        Ok(api.reorder(&request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::sections::SectionType;
    use async_trait::async_trait;
    use chrono::Utc;
    use reqwest::StatusCode;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// In-memory stand-in for the sections endpoints, applying reorders the way the server does.
    struct FakeSectionsApi {
        company_id: CompanyId,
        state: Mutex<(Vec<SectionResponse>, i64)>,
        fail_reorder: Option<fn() -> ClientError>,
        listing_down: Mutex<bool>,
        reorder_calls: Mutex<Vec<ReorderRequest>>,
    }

    impl FakeSectionsApi {
        fn new(company_id: CompanyId, titles: &[&str]) -> Self {
            let now = Utc::now();
            let sections = titles
                .iter()
                .enumerate()
                .map(|(i, title)| SectionResponse {
                    id: Uuid::new_v4(),
                    company_id,
                    section_type: SectionType::Custom,
                    title: title.to_string(),
                    content: String::new(),
                    media_url: None,
                    order_index: i as i32,
                    is_visible: true,
                    created_at: now,
                    updated_at: now,
                })
                .collect();
            Self {
                company_id,
                state: Mutex::new((sections, 0)),
                fail_reorder: None,
                listing_down: Mutex::new(false),
                reorder_calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(mut self, error: fn() -> ClientError) -> Self {
            self.fail_reorder = Some(error);
            self
        }
    }

    #[async_trait]
    impl SectionsApi for FakeSectionsApi {
        async fn list_owner_sections(&self, company_id: CompanyId) -> Result<OwnerListing, ClientError> {
            assert_eq!(company_id, self.company_id);
            if *self.listing_down.lock().unwrap() {
                return Err(ClientError::Status {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: "Service unavailable".to_string(),
                });
            }
            let (sections, version) = self.state.lock().unwrap().clone();
            let mut sections = sections;
            sections.sort_by_key(|s| s.order_index);
            Ok(OwnerListing { sections, version })
        }

        async fn reorder(&self, request: &ReorderRequest) -> Result<ReorderResponse, ClientError> {
            self.reorder_calls.lock().unwrap().push(request.clone());
            if let Some(error) = self.fail_reorder {
                return Err(error());
            }

            let mut state = self.state.lock().unwrap();
            if request.expected_version.is_some_and(|v| v != state.1) {
                return Err(ClientError::Conflict {
                    message: "Sections have changed since they were loaded".to_string(),
                });
            }
            for pair in &request.sections {
                if let Some(section) = state.0.iter_mut().find(|s| s.id == pair.id) {
                    section.order_index = pair.order_index;
                }
            }
            state.1 += 1;
            Ok(ReorderResponse {
                success: true,
                version: state.1,
                applied: request.sections.len() as u64,
                skipped: 0,
            })
        }
    }

    fn titles(sections: &[SectionResponse]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_commit_publishes_and_reconciles() {
        let company_id = Uuid::new_v4();
        let api = FakeSectionsApi::new(company_id, &["A", "B", "C"]);
        let mut draft = SectionDraft::load(&api, company_id).await.unwrap();

        draft.move_section(2, 0).unwrap();
        assert_eq!(titles(draft.sections()), vec!["C", "A", "B"]);
        assert_eq!(titles(draft.confirmed()), vec!["A", "B", "C"]);
        assert!(draft.is_dirty());

        let response = draft.commit(&api).await.unwrap().unwrap();
        assert_eq!(response.version, 1);

        assert!(!draft.is_dirty());
        assert_eq!(draft.version(), 1);
        assert_eq!(titles(draft.confirmed()), vec!["C", "A", "B"]);
        assert_eq!(
            draft.confirmed().iter().map(|s| s.order_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );

        let calls = api.reorder_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].expected_version, Some(0));
    }

    #[tokio::test]
    async fn test_commit_clean_draft_is_noop() {
        let company_id = Uuid::new_v4();
        let api = FakeSectionsApi::new(company_id, &["A", "B"]);
        let mut draft = SectionDraft::load(&api, company_id).await.unwrap();

        // Moving away and back leaves the draft clean
        draft.move_section(0, 1).unwrap();
        draft.move_section(1, 0).unwrap();

        assert!(draft.commit(&api).await.unwrap().is_none());
        assert!(api.reorder_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conflict_rolls_back() {
        let company_id = Uuid::new_v4();
        let api = FakeSectionsApi::new(company_id, &["A", "B", "C"]);
        let mut draft = SectionDraft::load(&api, company_id).await.unwrap();

        // Someone else reorders first
        api.state.lock().unwrap().1 = 5;

        draft.move_section(0, 2).unwrap();
        let err = draft.commit(&api).await.unwrap_err();

        assert!(matches!(err, DraftError::Client(ClientError::Conflict { .. })));
        assert_eq!(titles(draft.sections()), vec!["A", "B", "C"]);
        assert!(!draft.is_dirty());
        assert_eq!(draft.version(), 0);
    }

    #[tokio::test]
    async fn test_server_error_rolls_back() {
        let company_id = Uuid::new_v4();
        let api = FakeSectionsApi::new(company_id, &["A", "B", "C"]).failing(|| ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        });
        let mut draft = SectionDraft::load(&api, company_id).await.unwrap();

        draft.move_section(1, 0).unwrap();
        assert!(draft.commit(&api).await.is_err());
        assert_eq!(titles(draft.sections()), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_failed_reread_requires_reload() {
        let company_id = Uuid::new_v4();
        let api = FakeSectionsApi::new(company_id, &["A", "B", "C"]);
        let mut draft = SectionDraft::load(&api, company_id).await.unwrap();

        draft.move_section(2, 0).unwrap();
        *api.listing_down.lock().unwrap() = true;
        let err = draft.commit(&api).await.unwrap_err();
        assert!(matches!(err, DraftError::Client(ClientError::Status { .. })));

        // The reorder landed, so the draft keeps it rather than the pre-commit order
        assert!(draft.needs_reload());
        assert_eq!(titles(draft.sections()), vec!["C", "A", "B"]);
        assert_eq!(titles(draft.confirmed()), vec!["C", "A", "B"]);
        assert_eq!(draft.version(), 1);

        draft.move_section(0, 2).unwrap();
        assert!(matches!(draft.commit(&api).await, Err(DraftError::NeedsReload)));
        assert_eq!(api.reorder_calls.lock().unwrap().len(), 1);

        assert!(draft.reload(&api).await.is_err());
        assert!(draft.needs_reload());

        *api.listing_down.lock().unwrap() = false;
        draft.reload(&api).await.unwrap();
        assert!(!draft.needs_reload());
        assert!(!draft.is_dirty());
        assert_eq!(titles(draft.sections()), vec!["C", "A", "B"]);
        assert_eq!(draft.version(), 1);

        draft.move_section(0, 2).unwrap();
        let response = draft.commit(&api).await.unwrap().unwrap();
        assert_eq!(response.version, 2);
        assert_eq!(titles(draft.confirmed()), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_move_by_id_and_request_payload() {
        let company_id = Uuid::new_v4();
        let api = FakeSectionsApi::new(company_id, &["A", "B", "C"]);
        let mut draft = SectionDraft::load(&api, company_id).await.unwrap();

        let c = draft.sections()[2].id;
        draft.move_section_by_id(c, 0).unwrap();

        let request = draft.reorder_request().unwrap();
        assert_eq!(request.expected_version, Some(0));
        assert_eq!(request.sections[0].id, c);
        assert_eq!(
            request.sections.iter().map(|p| p.order_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );

        let unknown = Uuid::new_v4();
        assert!(matches!(
            draft.move_section_by_id(unknown, 0),
            Err(DraftError::Ordering(OrderingError::UnknownSection(id))) if id == unknown
        ));
    }

    #[tokio::test]
    async fn test_explicit_rollback() {
        let company_id = Uuid::new_v4();
        let api = FakeSectionsApi::new(company_id, &["A", "B"]);
        let mut draft = SectionDraft::load(&api, company_id).await.unwrap();

        draft.move_section(0, 1).unwrap();
        assert!(draft.move_section(0, 2).is_err());
        draft.rollback();

        assert_eq!(titles(draft.sections()), vec!["A", "B"]);
        assert!(!draft.is_dirty());
    }
}
