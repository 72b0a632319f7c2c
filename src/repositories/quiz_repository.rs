use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::Quiz};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn create_draft(&self, quiz: Quiz) -> AppResult<Quiz>;
    /// Replaces the stored quiz only while it is still a draft.
    async fn update_draft(&self, quiz: Quiz) -> AppResult<Option<Quiz>>;
    /// Conditional Draft -> Published. `None` when the quiz was not a draft.
    async fn publish(&self, id: &str, published_at: DateTime<Utc>) -> AppResult<Option<Quiz>>;
    async fn list_published(&self, class_id: Option<String>) -> AppResult<Vec<Quiz>>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let listing_index = IndexModel::builder()
            .keys(doc! { "publish_state": 1, "class_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("publish_state_class".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(listing_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn create_draft(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn update_draft(&self, quiz: Quiz) -> AppResult<Option<Quiz>> {
        let updated = self
            .collection
            .find_one_and_replace(doc! { "id": &quiz.id, "publish_state": "Draft" }, &quiz)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn publish(&self, id: &str, published_at: DateTime<Utc>) -> AppResult<Option<Quiz>> {
        let stamp = to_bson(&published_at)?;
        let published = self
            .collection
            .find_one_and_update(
                doc! { "id": id, "publish_state": "Draft" },
                doc! {
                    "$set": {
                        "publish_state": "Published",
                        "published_at": stamp.clone(),
                        "modified_at": stamp,
                    }
                },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(published)
    }

    async fn list_published(&self, class_id: Option<String>) -> AppResult<Vec<Quiz>> {
        let mut filter = doc! { "publish_state": "Published" };

        if let Some(class_id) = class_id {
            filter.insert("class_id", class_id);
        }

        let quizzes = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }
}
