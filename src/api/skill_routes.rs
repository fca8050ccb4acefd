//! CRUD endpoints for skills.
//!
//! Writes resolve the category by name and the parent by id before
//! anything touches storage; the repository only ever sees validated,
//! shaped records. Partial update is narrowed to {level, user_comment}
//! and re-validates the level bound on that path.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::api::partial_update::{check_patch_fields, take_field, SKILL_PATCH_FIELDS};
use crate::database::{CategoryRepository, SkillRepository};
use crate::error::ApiError;
use crate::models::validation::validate_level;
use crate::models::{SkillInput, SkillRecord, SkillView};

/// Validate and shape a create/replace payload into a record the
/// repository can persist as-is. `skill_id` is the target of a
/// replace; it anchors the parent-chain cycle check (a freshly created
/// skill cannot be its own ancestor, so creates pass `None`).
async fn shape_skill(
    pool: &PgPool,
    input: &SkillInput,
    skill_id: Option<i64>,
) -> Result<SkillRecord, ApiError> {
    validate_level(input.level)?;

    let category = CategoryRepository::new(pool.clone())
        .get_by_name(&input.category)
        .await?
        .ok_or_else(|| {
            ApiError::validation("category", format!("unknown category '{}'", input.category))
        })?;

    let skills = SkillRepository::new(pool.clone());
    if let Some(parent) = input.parent {
        if !skills.exists(parent).await? {
            return Err(ApiError::validation(
                "parent",
                format!("unknown skill {parent}"),
            ));
        }
        if let Some(id) = skill_id {
            if skills.chain_contains(parent, id).await? {
                return Err(ApiError::validation(
                    "parent",
                    "parent chain would contain a cycle",
                ));
            }
        }
    }

    Ok(SkillRecord {
        name: input.name.clone(),
        category_id: category.id,
        level: input.level,
        description: input.description.clone(),
        user_comment: input.user_comment.clone(),
        parent_id: input.parent,
    })
}

/// Apply an allowlisted PATCH payload to the current record. Pure:
/// every present field is validated before anything is changed, and a
/// failure leaves the record untouched by the caller (storage is only
/// written after this returns Ok).
fn apply_skill_patch(
    current: &SkillRecord,
    payload: &Map<String, Value>,
) -> Result<SkillRecord, ApiError> {
    check_patch_fields(payload, SKILL_PATCH_FIELDS)?;

    let level = take_field::<i32>(payload, "level")?;
    let user_comment = take_field::<String>(payload, "user_comment")?;

    if let Some(level) = level {
        validate_level(level)?;
    }

    let mut record = current.clone();
    if let Some(level) = level {
        record.level = level;
    }
    if let Some(comment) = user_comment {
        record.user_comment = comment;
    }
    Ok(record)
}

/// GET /api/skills
async fn list_skills(State(pool): State<PgPool>) -> Result<Json<Vec<SkillView>>, ApiError> {
    let skills = SkillRepository::new(pool).list().await?;
    Ok(Json(skills))
}

/// POST /api/skills
async fn create_skill(
    State(pool): State<PgPool>,
    Json(input): Json<SkillInput>,
) -> Result<(StatusCode, Json<SkillView>), ApiError> {
    let record = shape_skill(&pool, &input, None).await?;
    let skill = SkillRepository::new(pool).create(&record).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// GET /api/skills/{id}
async fn get_skill(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<SkillView>, ApiError> {
    let skill = SkillRepository::new(pool)
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("skill", id))?;
    Ok(Json(skill))
}

/// PUT /api/skills/{id}
async fn replace_skill(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(input): Json<SkillInput>,
) -> Result<Json<SkillView>, ApiError> {
    let record = shape_skill(&pool, &input, Some(id)).await?;
    let skill = SkillRepository::new(pool)
        .update(id, &record)
        .await?
        .ok_or_else(|| ApiError::not_found("skill", id))?;
    Ok(Json(skill))
}

/// PATCH /api/skills/{id}
///
/// Only `level` and `user_comment` may appear in the payload; any
/// other key rejects the request before storage is touched.
async fn patch_skill(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<Json<SkillView>, ApiError> {
    let payload = payload
        .as_object()
        .ok_or_else(|| ApiError::validation("non_field_errors", "expected a JSON object"))?;

    let repo = SkillRepository::new(pool);
    let current = repo
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("skill", id))?;

    let record = apply_skill_patch(&SkillRecord::from_view(&current), payload)?;
    let skill = repo
        .update(id, &record)
        .await?
        .ok_or_else(|| ApiError::not_found("skill", id))?;
    Ok(Json(skill))
}

/// DELETE /api/skills/{id}
///
/// Children referencing the skill as parent keep their rows; the
/// store nulls their parent_id.
async fn delete_skill(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !SkillRepository::new(pool).delete(id).await? {
        return Err(ApiError::not_found("skill", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_skill_router(pool: PgPool) -> Router {
    Router::new()
        .route("/api/skills", get(list_skills).post(create_skill))
        .route(
            "/api/skills/:id",
            get(get_skill)
                .put(replace_skill)
                .patch(patch_skill)
                .delete(delete_skill),
        )
        .with_state(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> SkillRecord {
        SkillRecord {
            name: "Django".to_string(),
            category_id: 1,
            level: 3,
            description: String::new(),
            user_comment: "learning".to_string(),
            parent_id: Some(1),
        }
    }

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn patch_updates_only_the_allowed_pair() {
        let body = payload(json!({"level": 5, "user_comment": "mastered"}));
        let updated = apply_skill_patch(&record(), &body).unwrap();
        assert_eq!(updated.level, 5);
        assert_eq!(updated.user_comment, "mastered");
        // everything else carries over
        assert_eq!(updated.name, "Django");
        assert_eq!(updated.parent_id, Some(1));
    }

    #[test]
    fn patch_with_a_disallowed_key_rejects_the_entire_payload() {
        let body = payload(json!({"level": 4, "name": "Flask"}));
        let err = apply_skill_patch(&record(), &body).unwrap_err();
        assert!(matches!(err, ApiError::DisallowedField { ref field } if field == "name"));
    }

    #[test]
    fn patch_revalidates_the_level_bound() {
        let body = payload(json!({"level": 7}));
        let err = apply_skill_patch(&record(), &body).unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "level", .. }));

        let body = payload(json!({"level": -1}));
        assert!(apply_skill_patch(&record(), &body).is_err());

        for level in 0..=5 {
            let body = payload(json!({ "level": level }));
            assert_eq!(apply_skill_patch(&record(), &body).unwrap().level, level);
        }
    }

    #[test]
    fn patch_touching_no_allowed_field_is_a_noop_error() {
        let body = payload(json!({}));
        let err = apply_skill_patch(&record(), &body).unwrap_err();
        assert!(matches!(err, ApiError::EmptyUpdate));
    }

    #[test]
    fn failed_patch_leaves_the_record_as_it_was() {
        let original = record();
        let body = payload(json!({"level": 9, "user_comment": "nope"}));
        assert!(apply_skill_patch(&original, &body).is_err());
        assert_eq!(original, record());
    }
}
