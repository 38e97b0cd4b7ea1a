//! Shared fixtures for HTTP handler tests.
//!
//! `InMemoryBlog` implements every domain port over mutex-guarded
//! collections, mirroring the storage-layer contracts the handlers rely on:
//! email uniqueness, the (post, actor) like constraint, and live counts.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    ImageStore, ImageStoreError, LikeLedger, LikeLedgerError, PostPersistenceError,
    PostRepository, TokenService, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccountService, AnonymousLikerPolicy, EmailAddress, ImageRef, LikeService, NewPost,
    NewUserRecord, Post, PostId, PostService, PostSummary, User, UserId, Username,
};
use crate::outbound::security::Argon2PasswordHasher;
use crate::outbound::token::JwtTokenService;

use super::state::HttpState;

pub(crate) const TEST_SECRET: &str = "test-signing-secret";

/// In-memory stand-in for the PostgreSQL adapters.
#[derive(Default)]
pub(crate) struct InMemoryBlog {
    users: Mutex<Vec<User>>,
    posts: Mutex<Vec<Post>>,
    likes: Mutex<HashSet<(PostId, UserId)>>,
}

#[async_trait]
impl UserRepository for InMemoryBlog {
    async fn insert(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut users = self.users.lock().expect("users lock");
        if users.iter().any(|user| user.email() == &record.email) {
            return Err(UserPersistenceError::DuplicateEmail);
        }
        let user = User::new(
            record.id,
            record.username.clone(),
            record.email.clone(),
            record.password_hash.clone(),
            Utc::now(),
        );
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("users lock");
        Ok(users.iter().find(|user| user.email() == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("users lock");
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }

    async fn ensure_placeholder(
        &self,
        record: &NewUserRecord,
    ) -> Result<(), UserPersistenceError> {
        let mut users = self.users.lock().expect("users lock");
        if users.iter().all(|user| user.id() != &record.id) {
            users.push(User::new(
                record.id,
                record.username.clone(),
                record.email.clone(),
                record.password_hash.clone(),
                Utc::now(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlog {
    async fn create(&self, new_post: &NewPost) -> Result<Post, PostPersistenceError> {
        let known_author = self
            .users
            .lock()
            .expect("users lock")
            .iter()
            .any(|user| user.id() == &new_post.author_id);
        if !known_author {
            return Err(PostPersistenceError::MissingAuthor);
        }

        let mut posts = self.posts.lock().expect("posts lock");
        let sequence = i64::try_from(posts.len()).expect("post count fits i64");
        let post = Post {
            id: new_post.id,
            title: new_post.draft.title().to_owned(),
            content: new_post.draft.content().to_owned(),
            author_id: new_post.author_id,
            image_path: new_post.image.clone(),
            created_at: Utc::now() + chrono::Duration::milliseconds(sequence),
        };
        posts.push(post.clone());
        Ok(post)
    }

    async fn list_summaries(&self) -> Result<Vec<PostSummary>, PostPersistenceError> {
        // Lock order everywhere: users, then posts, then likes.
        let users = self.users.lock().expect("users lock");
        let mut posts = self.posts.lock().expect("posts lock").clone();
        let likes = self.likes.lock().expect("likes lock");
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        posts
            .into_iter()
            .map(|post| {
                let publisher_name = users
                    .iter()
                    .find(|user| user.id() == &post.author_id)
                    .map(|user| user.username().clone())
                    .unwrap_or_else(|| Username::new("unknown").expect("valid name"));
                let total_likes = i64::try_from(
                    likes.iter().filter(|(p, _)| p == &post.id).count(),
                )
                .expect("like count fits i64");
                Ok(PostSummary {
                    post,
                    publisher_name,
                    total_likes,
                })
            })
            .collect()
    }
}

#[async_trait]
impl LikeLedger for InMemoryBlog {
    async fn insert(&self, post: &PostId, actor: &UserId) -> Result<(), LikeLedgerError> {
        let known_post = self
            .posts
            .lock()
            .expect("posts lock")
            .iter()
            .any(|row| &row.id == post);
        if !known_post {
            return Err(LikeLedgerError::MissingPost);
        }
        let mut likes = self.likes.lock().expect("likes lock");
        if !likes.insert((*post, *actor)) {
            return Err(LikeLedgerError::Duplicate);
        }
        Ok(())
    }

    async fn remove(&self, post: &PostId, actor: &UserId) -> Result<bool, LikeLedgerError> {
        let mut likes = self.likes.lock().expect("likes lock");
        Ok(likes.remove(&(*post, *actor)))
    }

    async fn count(&self, post: &PostId) -> Result<i64, LikeLedgerError> {
        let likes = self.likes.lock().expect("likes lock");
        Ok(i64::try_from(likes.iter().filter(|(p, _)| p == post).count())
            .expect("like count fits i64"))
    }
}

#[async_trait]
impl ImageStore for InMemoryBlog {
    async fn store(
        &self,
        original_filename: &str,
        _bytes: &[u8],
    ) -> Result<ImageRef, ImageStoreError> {
        Ok(ImageRef::new(format!("/uploads/mem-{original_filename}")))
    }
}

/// Issue a token the test state will accept.
pub(crate) fn issue_token(subject: &UserId) -> String {
    JwtTokenService::new(TEST_SECRET, 3600)
        .issue(subject)
        .expect("issue test token")
        .into_string()
}

/// Build handler state over a fresh in-memory blog.
pub(crate) fn test_state(open_posting: bool) -> web::Data<HttpState> {
    let blog = Arc::new(InMemoryBlog::default());
    test_state_with(blog, open_posting)
}

/// Build handler state sharing the given in-memory blog.
pub(crate) fn test_state_with(
    blog: Arc<InMemoryBlog>,
    open_posting: bool,
) -> web::Data<HttpState> {
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(TEST_SECRET, 3600));
    let accounts = AccountService::new(
        blog.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        tokens.clone(),
    );
    let posts = PostService::new(blog.clone(), blog.clone());
    let likes = LikeService::new(blog.clone(), blog, AnonymousLikerPolicy::AutoCreate);
    web::Data::new(HttpState::new(
        accounts,
        posts,
        likes,
        tokens,
        open_posting,
    ))
}

/// Register a user directly against the in-memory store.
pub(crate) async fn seed_user(blog: &InMemoryBlog, username: &str, email: &str) -> UserId {
    let record = NewUserRecord {
        id: UserId::random(),
        username: Username::new(username).expect("valid username"),
        email: EmailAddress::new(email).expect("valid email"),
        password_hash: String::new(),
    };
    let user = UserRepository::insert(blog, &record)
        .await
        .expect("seed user");
    *user.id()
}

/// Create a post directly against the in-memory store.
pub(crate) async fn seed_post(blog: &InMemoryBlog, author: UserId, title: &str) -> PostId {
    let new_post = NewPost {
        id: PostId::random(),
        author_id: author,
        draft: crate::domain::PostDraft::try_from_parts(title, "seeded body")
            .expect("valid draft"),
        image: None,
    };
    let post = PostRepository::create(blog, &new_post)
        .await
        .expect("seed post");
    post.id
}
