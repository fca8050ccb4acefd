//! Postgres-backed integration tests.
//!
//! These run against a live database with the schema from
//! `sql/schema.sql` already loaded:
//!
//! ```text
//! cargo test --features pg-tests
//! ```
//!
//! Each run tags its rows with a unique name prefix and removes them
//! afterwards, so the tests can share a database with other data.

#![cfg(feature = "pg-tests")]

use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use sqlx::PgPool;

use techtree::database::{
    CategoryRepository, NodeRepository, RelationRepository, SkillRepository,
};
use techtree::error::ApiError;
use techtree::models::{
    CategoryInput, NodeInput, NodeType, RelationFilter, RelationInput, RelationType, SkillRecord,
};

struct TestDb {
    pool: PgPool,
    prefix: String,
}

impl TestDb {
    async fn new() -> Result<Self> {
        let url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .unwrap_or_else(|_| "postgresql://localhost:5432/techtree".into());

        // Tests run in parallel inside one process, so the prefix
        // combines the pid with a per-test counter.
        static SEQ: AtomicU32 = AtomicU32::new(0);
        let pool = PgPool::connect(&url).await?;
        let prefix = format!(
            "t{}_{}",
            std::process::id(),
            SEQ.fetch_add(1, Ordering::Relaxed)
        );
        Ok(Self { pool, prefix })
    }

    fn name(&self, base: &str) -> String {
        format!("{}_{}", self.prefix, base)
    }

    async fn cleanup(&self) -> Result<()> {
        let pattern = format!("{}%", self.prefix);

        // Relations cascade away with their nodes.
        sqlx::query("DELETE FROM nodes WHERE name LIKE $1")
            .bind(&pattern)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM skills WHERE name LIKE $1")
            .bind(&pattern)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM categories WHERE name LIKE $1")
            .bind(&pattern)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_node(&self, base: &str) -> Result<i64> {
        let node = NodeRepository::new(self.pool.clone())
            .create(&NodeInput {
                name: self.name(base),
                node_type: NodeType::Technology,
                category: "Backend".into(),
                description: String::new(),
                tags: vec![],
            })
            .await?;
        Ok(node.id)
    }
}

#[tokio::test]
async fn node_create_then_get_round_trips() -> Result<()> {
    let db = TestDb::new().await?;
    let repo = NodeRepository::new(db.pool.clone());

    let created = repo
        .create(&NodeInput {
            name: db.name("python"),
            node_type: NodeType::Technology,
            category: "Backend".into(),
            description: "general-purpose language".into(),
            tags: vec!["scripting".into(), "web".into()],
        })
        .await?;

    let fetched = repo.get(created.id).await?.expect("node should exist");
    assert_eq!(fetched, created);
    assert_eq!(fetched.tags, vec!["scripting", "web"]);

    db.cleanup().await
}

#[tokio::test]
async fn duplicate_node_name_maps_to_conflict() -> Result<()> {
    let db = TestDb::new().await?;
    let repo = NodeRepository::new(db.pool.clone());

    let input = NodeInput {
        name: db.name("rust"),
        node_type: NodeType::Technology,
        category: String::new(),
        description: String::new(),
        tags: vec![],
    };
    repo.create(&input).await?;
    let err = repo.create(&input).await.expect_err("unique name");
    assert!(matches!(ApiError::from(err), ApiError::Conflict { .. }));

    db.cleanup().await
}

#[tokio::test]
async fn relation_create_then_get_round_trips() -> Result<()> {
    let db = TestDb::new().await?;
    let from = db.create_node("django").await?;
    let to = db.create_node("postgres").await?;
    let repo = RelationRepository::new(db.pool.clone());

    let created = repo
        .create(&RelationInput {
            from_node_id: from,
            to_node_id: to,
            relation_type: RelationType::UsedWith,
            strength: 0.8,
            context: Some("web".into()),
        })
        .await?;

    let fetched = repo.get(created.id).await?.expect("relation should exist");
    assert_eq!(fetched, created);
    assert_eq!(fetched.relation_type, RelationType::UsedWith);
    assert_eq!(fetched.strength, 0.8);

    db.cleanup().await
}

#[tokio::test]
async fn strength_range_filter_is_inclusive_on_both_ends() -> Result<()> {
    let db = TestDb::new().await?;
    let from = db.create_node("linux").await?;
    let to = db.create_node("docker").await?;
    let repo = RelationRepository::new(db.pool.clone());

    let mut by_strength = Vec::new();
    for strength in [0.4, 0.5, 0.7, 0.9, 1.0] {
        let relation = repo
            .create(&RelationInput {
                from_node_id: from,
                to_node_id: to,
                relation_type: RelationType::Related,
                strength,
                context: None,
            })
            .await?;
        by_strength.push((strength, relation.id));
    }

    let filter = RelationFilter {
        min_strength: Some(0.5),
        max_strength: Some(0.9),
        ..Default::default()
    };
    let results = repo.list(&filter).await?;
    let ids: Vec<i64> = results.iter().map(|r| r.id).collect();

    for (strength, id) in &by_strength {
        let expected = (0.5..=0.9).contains(strength);
        assert_eq!(
            ids.contains(id),
            expected,
            "strength {strength} in-range mismatch"
        );
    }

    db.cleanup().await
}

#[tokio::test]
async fn relation_type_and_context_filters_narrow_the_list() -> Result<()> {
    let db = TestDb::new().await?;
    let from = db.create_node("typescript").await?;
    let to = db.create_node("angular").await?;
    let repo = RelationRepository::new(db.pool.clone());

    let prereq = repo
        .create(&RelationInput {
            from_node_id: from,
            to_node_id: to,
            relation_type: RelationType::Prerequisite,
            strength: 0.5,
            context: Some(db.name("frontend")),
        })
        .await?;
    let alt = repo
        .create(&RelationInput {
            from_node_id: from,
            to_node_id: to,
            relation_type: RelationType::Alternative,
            strength: 0.5,
            context: None,
        })
        .await?;

    let filter = RelationFilter {
        relation_type: Some("prerequisite".into()),
        context: Some(db.name("frontend")),
        ..Default::default()
    };
    let ids: Vec<i64> = repo.list(&filter).await?.iter().map(|r| r.id).collect();
    assert!(ids.contains(&prereq.id));
    assert!(!ids.contains(&alt.id));

    db.cleanup().await
}

#[tokio::test]
async fn deleting_a_node_cascades_its_relations() -> Result<()> {
    let db = TestDb::new().await?;
    let from = db.create_node("html").await?;
    let to = db.create_node("css").await?;
    let nodes = NodeRepository::new(db.pool.clone());
    let relations = RelationRepository::new(db.pool.clone());

    let outgoing = relations
        .create(&RelationInput {
            from_node_id: from,
            to_node_id: to,
            relation_type: RelationType::BuiltOn,
            strength: 0.5,
            context: None,
        })
        .await?;
    let incoming = relations
        .create(&RelationInput {
            from_node_id: to,
            to_node_id: from,
            relation_type: RelationType::Related,
            strength: 0.5,
            context: None,
        })
        .await?;

    assert!(nodes.delete(from).await?);
    assert!(relations.get(outgoing.id).await?.is_none());
    assert!(relations.get(incoming.id).await?.is_none());

    db.cleanup().await
}

async fn seed_category(db: &TestDb, base: &str) -> Result<i64> {
    let category = CategoryRepository::new(db.pool.clone())
        .create(&CategoryInput {
            name: db.name(base),
            color: "#4a5568".into(),
        })
        .await?;
    Ok(category.id)
}

fn skill_record(db: &TestDb, base: &str, category_id: i64, parent_id: Option<i64>) -> SkillRecord {
    SkillRecord {
        name: db.name(base),
        category_id,
        level: 3,
        description: String::new(),
        user_comment: String::new(),
        parent_id,
    }
}

#[tokio::test]
async fn skill_view_denormalizes_its_category() -> Result<()> {
    let db = TestDb::new().await?;
    let category_id = seed_category(&db, "backend").await?;
    let repo = SkillRepository::new(db.pool.clone());

    let created = repo
        .create(&skill_record(&db, "flask", category_id, None))
        .await?;
    assert_eq!(created.category, db.name("backend"));
    assert_eq!(created.category_id, category_id);
    assert_eq!(created.category_color, "#4a5568");

    let fetched = repo.get(created.id).await?.expect("skill should exist");
    assert_eq!(fetched, created);

    db.cleanup().await
}

#[tokio::test]
async fn deleting_a_parent_skill_nulls_the_child_reference() -> Result<()> {
    let db = TestDb::new().await?;
    let category_id = seed_category(&db, "infra").await?;
    let repo = SkillRepository::new(db.pool.clone());

    let parent = repo
        .create(&skill_record(&db, "linux_skill", category_id, None))
        .await?;
    let child = repo
        .create(&skill_record(&db, "docker_skill", category_id, Some(parent.id)))
        .await?;
    assert_eq!(child.parent_id, Some(parent.id));

    assert!(repo.delete(parent.id).await?);
    let child = repo.get(child.id).await?.expect("child survives");
    assert_eq!(child.parent_id, None);

    db.cleanup().await
}

#[tokio::test]
async fn parent_chain_walk_detects_ancestry() -> Result<()> {
    let db = TestDb::new().await?;
    let category_id = seed_category(&db, "chain").await?;
    let repo = SkillRepository::new(db.pool.clone());

    let a = repo.create(&skill_record(&db, "a", category_id, None)).await?;
    let b = repo
        .create(&skill_record(&db, "b", category_id, Some(a.id)))
        .await?;
    let c = repo
        .create(&skill_record(&db, "c", category_id, Some(b.id)))
        .await?;

    // c -> b -> a: re-parenting a under c would close a cycle
    assert!(repo.chain_contains(c.id, a.id).await?);
    assert!(repo.chain_contains(a.id, a.id).await?);
    assert!(!repo.chain_contains(a.id, c.id).await?);

    db.cleanup().await
}

#[tokio::test]
async fn unknown_category_name_resolves_to_none() -> Result<()> {
    let db = TestDb::new().await?;
    let repo = CategoryRepository::new(db.pool.clone());

    assert!(repo.get_by_name(&db.name("missing")).await?.is_none());

    let created = repo
        .create(&CategoryInput {
            name: db.name("frontend"),
            color: "#ff0000".into(),
        })
        .await?;
    let found = repo.get_by_name(&created.name).await?.expect("by name");
    assert_eq!(found, created);

    db.cleanup().await
}
