//! Shared fixtures for integration tests: an in-memory store wired to every
//! service, plus seeded accounts.

#![allow(dead_code)]

use std::sync::Arc;

use campus_voice::config::Config;
use campus_voice::hasher::Argon2Hasher;
use campus_voice::models::User;
use campus_voice::service::{
	ComplaintService, IdentityService, NotificationService, SuggestionService,
};
use campus_voice::store::Store;
use campus_voice::types::UserRole;

pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
	pub store: Store,
	pub identity: IdentityService,
	pub complaints: ComplaintService,
	pub suggestions: SuggestionService,
	pub notifications: NotificationService,
}

pub async fn test_app() -> TestApp {
	test_app_with(Config::default()).await
}

pub async fn test_app_with(config: Config) -> TestApp {
	let store = Store::open_in_memory().await.unwrap();
	let hasher = Arc::new(Argon2Hasher::new());
	TestApp {
		identity: IdentityService::new(store.clone(), hasher),
		complaints: ComplaintService::new(store.clone(), config),
		suggestions: SuggestionService::new(store.clone()),
		notifications: NotificationService::new(store.clone()),
		store,
	}
}

pub async fn student(app: &TestApp, email: &str) -> User {
	app.identity
		.register("Some Student", email, PASSWORD, UserRole::Student)
		.await
		.unwrap()
}

pub async fn admin(app: &TestApp, email: &str) -> User {
	app.identity
		.register("Some Admin", email, PASSWORD, UserRole::Admin)
		.await
		.unwrap()
}
