//! Account deletion and its explicit cascade.

mod common;

use campus_voice::Error;
use campus_voice::types::{Category, Visibility};

use common::{TestApp, admin, student, test_app};

async fn seed_complaint(app: &TestApp, sender: &str) -> uuid::Uuid {
	app.complaints
		.submit(sender, Category::Academic, Visibility::Public, "t", "m", None)
		.await
		.unwrap()
		.id
}

#[tokio::test]
async fn deleting_a_sender_removes_owned_records() {
	let app = test_app().await;
	let ana = student(&app, "ana@uni.edu").await;
	admin(&app, "boss@uni.edu").await;
	seed_complaint(&app, "ana@uni.edu").await;
	app.suggestions
		.submit("ana@uni.edu", Category::Activities, Visibility::Public, "t", "m", None)
		.await
		.unwrap();

	app.identity.delete_user("ana@uni.edu").await.unwrap();

	assert!(app.identity.find_by_email("ana@uni.edu").await.unwrap().is_none());
	assert!(app.complaints.list_all().await.unwrap().is_empty());
	assert!(app.suggestions.list_all(None).await.unwrap().is_empty());
	assert!(
		app.store
			.list_notifications_for_user(ana.id)
			.await
			.unwrap()
			.is_empty()
	);
}

#[tokio::test]
async fn deleting_a_sender_nulls_admin_notification_back_references() {
	let app = test_app().await;
	student(&app, "ana@uni.edu").await;
	let boss = admin(&app, "boss@uni.edu").await;
	seed_complaint(&app, "ana@uni.edu").await;

	app.identity.delete_user("ana@uni.edu").await.unwrap();

	// The admin keeps the notification but it no longer points at a record.
	let inbox = app.notifications.list_for_user(&boss).await.unwrap();
	assert_eq!(inbox.len(), 1);
	assert_eq!(inbox[0].complaint_id, None);
}

#[tokio::test]
async fn deleting_a_responder_keeps_the_response() {
	let app = test_app().await;
	student(&app, "ana@uni.edu").await;
	let boss = admin(&app, "boss@uni.edu").await;
	let complaint_id = seed_complaint(&app, "ana@uni.edu").await;
	app.complaints
		.respond(complaint_id, "handled", &boss)
		.await
		.unwrap();

	app.identity.delete_user("boss@uni.edu").await.unwrap();

	let stored = app.store.get_complaint(complaint_id).await.unwrap().unwrap();
	assert_eq!(stored.response_message.as_deref(), Some("handled"));
	assert_eq!(stored.responder_id, None);
}

#[tokio::test]
async fn deleting_an_unknown_user_is_not_found() {
	let app = test_app().await;

	let err = app.identity.delete_user("ghost@uni.edu").await.unwrap_err();
	assert!(matches!(err, Error::NotFound(_)));
}
