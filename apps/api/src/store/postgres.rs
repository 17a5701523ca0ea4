use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::embedding::EmbeddingVector;
use crate::matching::skills::{ProfileSkillSet, SkillTerm};
use crate::models::job::{JobDraft, JobPosting, JobRow};
use crate::models::profile::{ProfileRow, ProfileView};
use crate::store::{JobStore, ProfileUpdate};

const JOB_COLUMNS: &str =
    "id, title, company, description, location, url, embedding, embedding_model, created_at";

#[derive(FromRow)]
struct NearestRow {
    #[sqlx(flatten)]
    job: JobRow,
    distance: f64,
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn skill_names(&self, profile_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM profile_skills WHERE profile_id = $1 ORDER BY name")
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<ProfileView>, sqlx::Error> {
        let profile = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, full_name, headline FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(profile) = profile else {
            return Ok(None);
        };
        let skills = self.skill_names(profile.id).await?;
        Ok(Some(ProfileView {
            full_name: profile.full_name,
            headline: profile.headline,
            skills,
        }))
    }

    async fn find_profile_skills(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfileSkillSet>, sqlx::Error> {
        let profile_id: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        match profile_id {
            Some(id) => Ok(Some(ProfileSkillSet::from_raw(self.skill_names(id).await?))),
            None => Ok(None),
        }
    }

    async fn replace_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<ProfileView, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let profile = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id, full_name, headline)
            VALUES ($1, COALESCE($2, 'Unknown'), COALESCE($3, ''))
            ON CONFLICT (user_id) DO UPDATE SET
                full_name = COALESCE($2, profiles.full_name),
                headline = COALESCE($3, profiles.headline),
                updated_at = now()
            RETURNING id, full_name, headline
            "#,
        )
        .bind(user_id)
        .bind(update.full_name.as_deref())
        .bind(update.headline.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        // Whole-set replacement: the previous skills never survive a re-upload.
        sqlx::query("DELETE FROM profile_skills WHERE profile_id = $1")
            .bind(profile.id)
            .execute(&mut *tx)
            .await?;

        let names: Vec<String> = update
            .skills
            .terms()
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();
        if !names.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO profile_skills (profile_id, name)
                SELECT $1, name FROM UNNEST($2::text[]) AS t(name)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(profile.id)
            .bind(&names)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(
            "Replaced skill set for user {user_id} ({} skills)",
            names.len()
        );

        let mut skills: Vec<String> = update
            .skills
            .into_terms()
            .into_iter()
            .map(|t: SkillTerm| t.as_str().to_string())
            .collect();
        skills.sort();

        Ok(ProfileView {
            full_name: profile.full_name,
            headline: profile.headline,
            skills,
        })
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobPosting>, sqlx::Error> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(JobPosting::from))
    }

    async fn recent_jobs(&self, limit: i64) -> Result<Vec<JobPosting>, sqlx::Error> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC, id LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn nearest_jobs(
        &self,
        query: &EmbeddingVector,
        limit: i64,
    ) -> Result<Vec<(JobPosting, f64)>, sqlx::Error> {
        // The vector is bound as a typed parameter. Rows from other models or
        // with other dimensions are excluded rather than compared.
        let rows = sqlx::query_as::<_, NearestRow>(&format!(
            r#"
            SELECT {JOB_COLUMNS}, (embedding <=> $1)::float8 AS distance
            FROM jobs
            WHERE embedding IS NOT NULL
              AND embedding_model = $2
              AND vector_dims(embedding) = $3
            ORDER BY embedding <=> $1 ASC, id
            LIMIT $4
            "#
        ))
        .bind(query.to_pgvector())
        .bind(query.model())
        .bind(query.dimensions() as i32)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (JobPosting::from(r.job), r.distance))
            .collect())
    }

    async fn insert_job(
        &self,
        draft: &JobDraft,
        embedding: Option<&EmbeddingVector>,
    ) -> Result<JobPosting, sqlx::Error> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            INSERT INTO jobs (title, company, description, location, url, embedding, embedding_model)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(&draft.company)
        .bind(&draft.description)
        .bind(draft.location.as_deref())
        .bind(draft.url.as_deref())
        .bind(embedding.map(EmbeddingVector::to_pgvector))
        .bind(embedding.map(EmbeddingVector::model))
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted job {} ({})", row.id, row.title);
        Ok(row.into())
    }
}
