//! Database repository for careers page sections.
//!
//! Every write that can change the display order of a company's sections (create, delete, an
//! update that sets `order_index`, and bulk reorder) bumps `companies.sections_version` in the same
//! transaction. A reorder carrying `expected_version` is rejected if the counter has moved.

use std::collections::HashMap;

use sqlx::{Connection, PgConnection};
use tracing::{debug, instrument};

use crate::api::models::sections::SectionOrder;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::sections::{ReorderOutcome, SectionCreateDBRequest, SectionDBResponse, SectionUpdateDBRequest},
};
use crate::ordering::dedupe_last_wins;
use crate::types::{CompanyId, SectionId, abbrev_uuid};

/// Display order: `order_index`, ties broken by creation time then id so every read agrees.
const DISPLAY_ORDER: &str = "ORDER BY order_index ASC, created_at ASC, id ASC";

/// Filter for listing sections
#[derive(Debug, Clone)]
pub struct SectionFilter {
    pub company_id: CompanyId,
    /// Public pages only see visible sections
    pub visible_only: bool,
}

impl SectionFilter {
    pub fn public(company_id: CompanyId) -> Self {
        Self {
            company_id,
            visible_only: true,
        }
    }

    pub fn owner(company_id: CompanyId) -> Self {
        Self {
            company_id,
            visible_only: false,
        }
    }
}

/// What a bulk reorder did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderResult {
    Applied(ReorderOutcome),
    /// `expected_version` did not match; nothing was written
    Stale { current_version: i64 },
}

pub struct Sections<'c> {
    db: &'c mut PgConnection,
}

/// Lock the company row and read its `sections_version`.
///
/// Every write that bumps the version takes this lock before touching any section row, so all of
/// them queue on the company row in the same order and cannot deadlock against each other.
async fn lock_company(conn: &mut PgConnection, company_id: CompanyId) -> Result<Option<i64>> {
    let version = sqlx::query_scalar::<_, i64>("SELECT sections_version FROM companies WHERE id = $1 FOR UPDATE")
        .bind(company_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(version)
}

async fn bump_version(conn: &mut PgConnection, company_id: CompanyId) -> Result<i64> {
    let version = sqlx::query_scalar::<_, i64>(
        "UPDATE companies SET sections_version = sections_version + 1, updated_at = NOW() WHERE id = $1 RETURNING sections_version",
    )
    .bind(company_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(version)
}

/// Owning company of a section, read without locking.
async fn company_of(conn: &mut PgConnection, id: SectionId) -> Result<Option<CompanyId>> {
    let company_id = sqlx::query_scalar::<_, CompanyId>("SELECT company_id FROM careers_sections WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(company_id)
}

#[async_trait::async_trait]
impl<'c> Repository for Sections<'c> {
    type CreateRequest = SectionCreateDBRequest;
    type UpdateRequest = SectionUpdateDBRequest;
    type Response = SectionDBResponse;
    type Id = SectionId;
    type Filter = SectionFilter;

    #[instrument(skip(self, request), fields(company_id = %abbrev_uuid(&request.company_id), order_index = request.order_index), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        lock_company(&mut tx, request.company_id).await?.ok_or(DbError::NotFound)?;

        let section = sqlx::query_as::<_, SectionDBResponse>(
            r#"
            INSERT INTO careers_sections (company_id, type, title, content, media_url, order_index, is_visible)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.company_id)
        .bind(request.section_type)
        .bind(&request.title)
        .bind(&request.content)
        .bind(&request.media_url)
        .bind(request.order_index)
        .bind(request.is_visible)
        .fetch_one(&mut *tx)
        .await?;

        bump_version(&mut tx, request.company_id).await?;
        tx.commit().await?;

        Ok(section)
    }

    #[instrument(skip(self), fields(section_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let section = sqlx::query_as::<_, SectionDBResponse>("SELECT * FROM careers_sections WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(section)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_bulk(&mut self, ids: Vec<SectionId>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sections = sqlx::query_as::<_, SectionDBResponse>("SELECT * FROM careers_sections WHERE id = ANY($1)")
            .bind(ids.as_slice())
            .fetch_all(&mut *self.db)
            .await?;

        Ok(sections.into_iter().map(|s| (s.id, s)).collect())
    }

    #[instrument(skip(self, filter), fields(company_id = %abbrev_uuid(&filter.company_id), visible_only = filter.visible_only), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let query = format!("SELECT * FROM careers_sections WHERE company_id = $1 AND (is_visible OR NOT $2) {DISPLAY_ORDER}");

        let sections = sqlx::query_as::<_, SectionDBResponse>(&query)
            .bind(filter.company_id)
            .bind(filter.visible_only)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(sections)
    }

    #[instrument(skip(self), fields(section_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        let Some(company_id) = company_of(&mut tx, id).await? else {
            return Ok(false);
        };
        lock_company(&mut tx, company_id).await?;

        // Siblings keep their indices: gaps are allowed
        let deleted = sqlx::query("DELETE FROM careers_sections WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Ok(false);
        }

        bump_version(&mut tx, company_id).await?;
        tx.commit().await?;

        Ok(true)
    }

    #[instrument(skip(self, request), fields(section_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        // Moves contend with reorders, so they queue on the company row first
        if request.order_index.is_some() {
            let company_id = company_of(&mut tx, id).await?.ok_or(DbError::NotFound)?;
            lock_company(&mut tx, company_id).await?;
        }

        let section = sqlx::query_as::<_, SectionDBResponse>(
            r#"
            UPDATE careers_sections SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                media_url = CASE WHEN $4 THEN $5 ELSE media_url END,
                order_index = COALESCE($6, order_index),
                is_visible = COALESCE($7, is_visible),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.content)
        .bind(request.media_url.is_some())
        .bind(request.media_url.clone().flatten())
        .bind(request.order_index)
        .bind(request.is_visible)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound)?;

        if request.order_index.is_some() {
            bump_version(&mut tx, section.company_id).await?;
        }
        tx.commit().await?;

        Ok(section)
    }
}

impl<'c> Sections<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Current `sections_version` of a company, `None` if the company does not exist.
    #[cfg(test)]
    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&company_id)), err)]
    pub async fn sections_version(&mut self, company_id: CompanyId) -> Result<Option<i64>> {
        let version = sqlx::query_scalar::<_, i64>("SELECT sections_version FROM companies WHERE id = $1")
            .bind(company_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(version)
    }

    /// Owner listing together with the version it reflects.
    #[instrument(skip(self), fields(company_id = %abbrev_uuid(&company_id)), err)]
    pub async fn list_with_version(&mut self, company_id: CompanyId) -> Result<(Vec<SectionDBResponse>, i64)> {
        let mut tx = self.db.begin().await?;

        // Reorders take this lock too, so the listing cannot interleave with one
        let version = sqlx::query_scalar::<_, i64>("SELECT sections_version FROM companies WHERE id = $1 FOR SHARE")
            .bind(company_id)
            .fetch_optional(&mut *tx)
            .await?
            .unwrap_or(0);

        let sections = Sections::new(&mut tx).list(&SectionFilter::owner(company_id)).await?;
        tx.commit().await?;

        Ok((sections, version))
    }

    /// Apply a bulk reorder for one company in a single transaction.
    ///
    /// The company row is locked for the duration, so concurrent reorders of the same company
    /// serialize. Pairs naming a section that does not exist or belongs to another company are
    /// skipped. If an id repeats, its last pair wins and the earlier ones count as skipped.
    #[instrument(skip(self, pairs), fields(company_id = %abbrev_uuid(&company_id), count = pairs.len()), err)]
    pub async fn reorder(&mut self, company_id: CompanyId, pairs: &[SectionOrder], expected_version: Option<i64>) -> Result<ReorderResult> {
        let mut tx = self.db.begin().await?;

        let current_version = lock_company(&mut tx, company_id).await?.ok_or(DbError::NotFound)?;

        if let Some(expected) = expected_version
            && expected != current_version
        {
            debug!(expected, current_version, "Rejecting stale reorder");
            return Ok(ReorderResult::Stale { current_version });
        }

        let unique = dedupe_last_wins(pairs);
        let ids: Vec<SectionId> = unique.iter().map(|p| p.id).collect();
        let indices: Vec<i32> = unique.iter().map(|p| p.order_index).collect();

        let result = sqlx::query(
            r#"
            UPDATE careers_sections SET order_index = v.idx, updated_at = NOW()
            FROM UNNEST($1::uuid[], $2::int4[]) AS v(id, idx)
            WHERE careers_sections.id = v.id AND careers_sections.company_id = $3
            "#,
        )
        .bind(&ids)
        .bind(&indices)
        .bind(company_id)
        .execute(&mut *tx)
        .await?;

        let version = bump_version(&mut tx, company_id).await?;
        tx.commit().await?;

        let applied = result.rows_affected();
        let skipped = pairs.len() as u64 - applied;
        debug!(applied, skipped, version, "Reorder applied");

        Ok(ReorderResult::Applied(ReorderOutcome { version, applied, skipped }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::sections::SectionType;
    use crate::ordering::assign_positions;
    use crate::test_utils::{create_test_company, create_test_section};
    use sqlx::PgPool;

    async fn titles(pool: &PgPool, filter: SectionFilter) -> Vec<String> {
        let mut conn = pool.acquire().await.unwrap();
        Sections::new(&mut conn)
            .list(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_orders_by_index_with_visible_filter(pool: PgPool) {
        let company = create_test_company(&pool, "techcorp").await;
        create_test_section(&pool, company.id, "Benefits", 2, true).await;
        create_test_section(&pool, company.id, "About", 0, true).await;
        create_test_section(&pool, company.id, "Hidden", 1, false).await;

        assert_eq!(titles(&pool, SectionFilter::owner(company.id)).await, vec!["About", "Hidden", "Benefits"]);
        assert_eq!(titles(&pool, SectionFilter::public(company.id)).await, vec!["About", "Benefits"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_ties_break_by_creation(pool: PgPool) {
        let company = create_test_company(&pool, "techcorp").await;
        create_test_section(&pool, company.id, "First", 0, true).await;
        create_test_section(&pool, company.id, "Second", 0, true).await;

        assert_eq!(titles(&pool, SectionFilter::owner(company.id)).await, vec!["First", "Second"]);
        assert_eq!(titles(&pool, SectionFilter::public(company.id)).await, vec!["First", "Second"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reorder_applies_input_order(pool: PgPool) {
        let company = create_test_company(&pool, "techcorp").await;
        let a = create_test_section(&pool, company.id, "A", 0, true).await;
        let b = create_test_section(&pool, company.id, "B", 1, true).await;
        let c = create_test_section(&pool, company.id, "C", 2, true).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Sections::new(&mut conn);
        let version = repo.sections_version(company.id).await.unwrap().unwrap();

        let pairs = assign_positions([c.id, a.id, b.id]).unwrap();
        let result = repo.reorder(company.id, &pairs, Some(version)).await.unwrap();

        assert_eq!(
            result,
            ReorderResult::Applied(ReorderOutcome {
                version: version + 1,
                applied: 3,
                skipped: 0
            })
        );
        assert_eq!(titles(&pool, SectionFilter::owner(company.id)).await, vec!["C", "A", "B"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reorder_skips_foreign_and_unknown_ids(pool: PgPool) {
        let techcorp = create_test_company(&pool, "techcorp").await;
        let other = create_test_company(&pool, "greenenergy").await;
        let a = create_test_section(&pool, techcorp.id, "A", 0, true).await;
        let b = create_test_section(&pool, techcorp.id, "B", 1, true).await;
        let foreign = create_test_section(&pool, other.id, "Foreign", 0, true).await;

        let mut conn = pool.acquire().await.unwrap();
        let pairs = vec![
            SectionOrder { id: b.id, order_index: 0 },
            SectionOrder { id: foreign.id, order_index: 7 },
            SectionOrder { id: uuid::Uuid::new_v4(), order_index: 3 },
            SectionOrder { id: a.id, order_index: 1 },
        ];
        let result = Sections::new(&mut conn).reorder(techcorp.id, &pairs, None).await.unwrap();

        let ReorderResult::Applied(outcome) = result else {
            panic!("expected reorder to apply");
        };
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 2);

        assert_eq!(titles(&pool, SectionFilter::owner(techcorp.id)).await, vec!["B", "A"]);
        let foreign_after = Sections::new(&mut conn).get_by_id(foreign.id).await.unwrap().unwrap();
        assert_eq!(foreign_after.order_index, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reorder_duplicate_id_last_wins(pool: PgPool) {
        let company = create_test_company(&pool, "techcorp").await;
        let a = create_test_section(&pool, company.id, "A", 0, true).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Sections::new(&mut conn);
        let pairs = vec![
            SectionOrder { id: a.id, order_index: 4 },
            SectionOrder { id: a.id, order_index: 9 },
        ];
        let ReorderResult::Applied(outcome) = repo.reorder(company.id, &pairs, None).await.unwrap() else {
            panic!("expected reorder to apply");
        };

        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(repo.get_by_id(a.id).await.unwrap().unwrap().order_index, 9);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reorder_stale_version_writes_nothing(pool: PgPool) {
        let company = create_test_company(&pool, "techcorp").await;
        let a = create_test_section(&pool, company.id, "A", 0, true).await;
        let b = create_test_section(&pool, company.id, "B", 1, true).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Sections::new(&mut conn);
        let current = repo.sections_version(company.id).await.unwrap().unwrap();

        let pairs = assign_positions([b.id, a.id]).unwrap();
        let result = repo.reorder(company.id, &pairs, Some(current - 1)).await.unwrap();

        assert_eq!(result, ReorderResult::Stale { current_version: current });
        assert_eq!(repo.sections_version(company.id).await.unwrap(), Some(current));
        assert_eq!(titles(&pool, SectionFilter::owner(company.id)).await, vec!["A", "B"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reorder_unknown_company_is_not_found(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let err = Sections::new(&mut conn)
            .reorder(uuid::Uuid::new_v4(), &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_order_affecting_writes_bump_version(pool: PgPool) {
        let company = create_test_company(&pool, "techcorp").await;
        let mut conn = pool.acquire().await.unwrap();

        let v0 = Sections::new(&mut conn).sections_version(company.id).await.unwrap().unwrap();

        let section = Sections::new(&mut conn)
            .create(&SectionCreateDBRequest {
                company_id: company.id,
                section_type: SectionType::About,
                title: "About".to_string(),
                content: String::new(),
                media_url: None,
                order_index: 0,
                is_visible: true,
            })
            .await
            .unwrap();
        let v1 = Sections::new(&mut conn).sections_version(company.id).await.unwrap().unwrap();
        assert_eq!(v1, v0 + 1);

        // Content edits leave the version alone
        Sections::new(&mut conn)
            .update(
                section.id,
                &SectionUpdateDBRequest {
                    title: Some("About us".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(Sections::new(&mut conn).sections_version(company.id).await.unwrap(), Some(v1));

        Sections::new(&mut conn)
            .update(
                section.id,
                &SectionUpdateDBRequest {
                    order_index: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(Sections::new(&mut conn).sections_version(company.id).await.unwrap(), Some(v1 + 1));

        assert!(Sections::new(&mut conn).delete(section.id).await.unwrap());
        assert_eq!(Sections::new(&mut conn).sections_version(company.id).await.unwrap(), Some(v1 + 2));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_does_not_compact(pool: PgPool) {
        let company = create_test_company(&pool, "techcorp").await;
        let a = create_test_section(&pool, company.id, "A", 0, true).await;
        let b = create_test_section(&pool, company.id, "B", 1, true).await;
        let c = create_test_section(&pool, company.id, "C", 2, true).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Sections::new(&mut conn);
        assert!(repo.delete(b.id).await.unwrap());
        assert!(!repo.delete(b.id).await.unwrap());

        let remaining = repo.get_bulk(vec![a.id, c.id]).await.unwrap();
        assert_eq!(remaining[&a.id].order_index, 0);
        assert_eq!(remaining[&c.id].order_index, 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_concurrent_order_writes_serialize(pool: PgPool) {
        const ROUNDS: i32 = 50;

        let company = create_test_company(&pool, "techcorp").await;
        let company_id = company.id;
        let a = create_test_section(&pool, company_id, "A", 0, true).await.id;
        let b = create_test_section(&pool, company_id, "B", 1, true).await.id;

        let mut conn = pool.acquire().await.unwrap();
        let start = Sections::new(&mut conn).sections_version(company_id).await.unwrap().unwrap();
        drop(conn);

        let reorders = tokio::spawn({
            let pool = pool.clone();
            async move {
                let mut conn = pool.acquire().await.unwrap();
                for i in 0..ROUNDS {
                    let pairs = [
                        SectionOrder { id: a, order_index: i % 2 },
                        SectionOrder { id: b, order_index: (i + 1) % 2 },
                    ];
                    Sections::new(&mut conn).reorder(company_id, &pairs, None).await.unwrap();
                }
            }
        });

        let moves = tokio::spawn({
            let pool = pool.clone();
            async move {
                let mut conn = pool.acquire().await.unwrap();
                for i in 0..ROUNDS {
                    let request = SectionUpdateDBRequest {
                        order_index: Some(i),
                        ..Default::default()
                    };
                    Sections::new(&mut conn).update(b, &request).await.unwrap();
                }
            }
        });

        let churn = tokio::spawn({
            let pool = pool.clone();
            async move {
                let mut conn = pool.acquire().await.unwrap();
                for i in 0..ROUNDS {
                    let section = Sections::new(&mut conn)
                        .create(&SectionCreateDBRequest {
                            company_id,
                            section_type: SectionType::Custom,
                            title: format!("Temp {i}"),
                            content: String::new(),
                            media_url: None,
                            order_index: 2,
                            is_visible: true,
                        })
                        .await
                        .unwrap();
                    assert!(Sections::new(&mut conn).delete(section.id).await.unwrap());
                }
            }
        });

        reorders.await.unwrap();
        moves.await.unwrap();
        churn.await.unwrap();

        // Each write bumped the version exactly once
        let mut conn = pool.acquire().await.unwrap();
        let end = Sections::new(&mut conn).sections_version(company_id).await.unwrap().unwrap();
        assert_eq!(end, start + 4 * i64::from(ROUNDS));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_media_url_absent_keeps_null_clears(pool: PgPool) {
        let company = create_test_company(&pool, "techcorp").await;
        let mut conn = pool.acquire().await.unwrap();
        let section = Sections::new(&mut conn)
            .create(&SectionCreateDBRequest {
                company_id: company.id,
                section_type: SectionType::Culture,
                title: "Culture".to_string(),
                content: String::new(),
                media_url: Some("https://example.com/a.png".to_string()),
                order_index: 0,
                is_visible: true,
            })
            .await
            .unwrap();

        let kept = Sections::new(&mut conn)
            .update(
                section.id,
                &SectionUpdateDBRequest {
                    title: Some("Our culture".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(kept.media_url.as_deref(), Some("https://example.com/a.png"));

        let cleared = Sections::new(&mut conn)
            .update(
                section.id,
                &SectionUpdateDBRequest {
                    media_url: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.media_url, None);
        assert_eq!(cleared.title, "Our culture");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_with_version(pool: PgPool) {
        let company = create_test_company(&pool, "techcorp").await;
        create_test_section(&pool, company.id, "A", 0, false).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Sections::new(&mut conn);
        let (sections, version) = repo.list_with_version(company.id).await.unwrap();

        assert_eq!(sections.len(), 1);
        assert_eq!(Some(version), repo.sections_version(company.id).await.unwrap());
    }
}
