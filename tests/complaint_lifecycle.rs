//! Complaint submission, triage, and the exactly-once response.

mod common;

use campus_voice::Error;
use campus_voice::config::Config;
use campus_voice::models::Attachment;
use campus_voice::policy::REDACTED_IDENTITY;
use campus_voice::types::{Category, ComplaintStatus, Visibility};
use uuid::Uuid;

use common::{TestApp, admin, student, test_app, test_app_with};

async fn submit(app: &TestApp, sender: &str, visibility: Visibility) -> Uuid {
	app.complaints
		.submit(
			sender,
			Category::It,
			visibility,
			"Wifi down in dorm B",
			"No connectivity since Monday",
			None,
		)
		.await
		.unwrap()
		.id
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn submission_starts_under_checking_and_notifies_admins_and_sender() {
	let app = test_app().await;
	let sender = student(&app, "ana@uni.edu").await;
	let admin_a = admin(&app, "a1@uni.edu").await;
	let admin_b = admin(&app, "a2@uni.edu").await;

	let id = submit(&app, "ana@uni.edu", Visibility::Public).await;

	let stored = app.store.get_complaint(id).await.unwrap().unwrap();
	assert_eq!(stored.status, ComplaintStatus::UnderChecking);
	assert!(stored.response_message.is_none());

	for a in [&admin_a, &admin_b] {
		let inbox = app.notifications.list_for_user(a).await.unwrap();
		assert_eq!(inbox.len(), 1);
		assert_eq!(inbox[0].complaint_id, Some(id));
		assert!(inbox[0].message.contains("Wifi down in dorm B"));
	}

	let inbox = app.notifications.list_for_user(&sender).await.unwrap();
	assert_eq!(inbox.len(), 1);
	assert!(inbox[0].message.contains("under checking"));
}

#[tokio::test]
async fn submission_records_attachment_fields() {
	let app = test_app().await;
	student(&app, "ana@uni.edu").await;

	let complaint = app
		.complaints
		.submit(
			"ana@uni.edu",
			Category::Administrative,
			Visibility::Private,
			"Fee receipt missing",
			"See attached scan",
			Some(Attachment {
				file_name: "receipt.pdf".into(),
				file_url: "/files/abc-receipt.pdf".into(),
			}),
		)
		.await
		.unwrap();

	assert_eq!(complaint.file_name.as_deref(), Some("receipt.pdf"));
	assert_eq!(complaint.file_url.as_deref(), Some("/files/abc-receipt.pdf"));
}

#[tokio::test]
async fn submission_rejects_blank_title_or_message_and_unknown_sender() {
	let app = test_app().await;
	student(&app, "ana@uni.edu").await;

	let err = app
		.complaints
		.submit("ana@uni.edu", Category::Academic, Visibility::Public, "  ", "m", None)
		.await
		.unwrap_err();
	assert!(matches!(err, Error::InvalidInput(_)));

	let err = app
		.complaints
		.submit("ana@uni.edu", Category::Academic, Visibility::Public, "t", "", None)
		.await
		.unwrap_err();
	assert!(matches!(err, Error::InvalidInput(_)));

	let err = app
		.complaints
		.submit("ghost@uni.edu", Category::Academic, Visibility::Public, "t", "m", None)
		.await
		.unwrap_err();
	assert!(matches!(err, Error::NotFound(_)));
}

// ============================================================================
// Visibility
// ============================================================================

#[tokio::test]
async fn private_complaints_redact_sender_in_listings() {
	let app = test_app().await;
	student(&app, "ana@uni.edu").await;
	let private = submit(&app, "ana@uni.edu", Visibility::Private).await;
	let public = submit(&app, "ana@uni.edu", Visibility::Public).await;

	let all = app.complaints.list_all().await.unwrap();
	let find = |id| all.iter().find(|v| v.complaint_id == id).unwrap();
	assert_eq!(find(private).student_email, REDACTED_IDENTITY);
	assert_eq!(find(public).student_email, "ana@uni.edu");
}

// ============================================================================
// Status triage
// ============================================================================

#[tokio::test]
async fn status_moves_freely_between_all_states() {
	let app = test_app().await;
	student(&app, "ana@uni.edu").await;
	let acting = admin(&app, "boss@uni.edu").await;
	let id = submit(&app, "ana@uni.edu", Visibility::Public).await;

	for status in ["done", "under_review", "in_progress", "under_checking"] {
		app.complaints.set_status(id, status, &acting).await.unwrap();
	}
	let stored = app.store.get_complaint(id).await.unwrap().unwrap();
	assert_eq!(stored.status, ComplaintStatus::UnderChecking);
}

#[tokio::test]
async fn status_update_rejects_bad_input() {
	let app = test_app().await;
	let sender = student(&app, "ana@uni.edu").await;
	let acting = admin(&app, "boss@uni.edu").await;
	let id = submit(&app, "ana@uni.edu", Visibility::Public).await;

	let err = app.complaints.set_status(id, "escalated", &acting).await.unwrap_err();
	assert!(matches!(err, Error::InvalidInput(_)));

	let err = app
		.complaints
		.set_status(Uuid::new_v4(), "done", &acting)
		.await
		.unwrap_err();
	assert!(matches!(err, Error::NotFound(_)));

	let err = app.complaints.set_status(id, "done", &sender).await.unwrap_err();
	assert!(matches!(err, Error::Unauthorized));
}

// ============================================================================
// Response (write-once)
// ============================================================================

#[tokio::test]
async fn respond_records_response_and_notifies_sender() {
	let app = test_app().await;
	let sender = student(&app, "ana@uni.edu").await;
	let acting = admin(&app, "boss@uni.edu").await;
	let id = submit(&app, "ana@uni.edu", Visibility::Private).await;

	let updated = app
		.complaints
		.respond(id, "A technician is on the way", &acting)
		.await
		.unwrap();
	assert_eq!(updated.response_message.as_deref(), Some("A technician is on the way"));
	assert_eq!(updated.responder_id, Some(acting.id));
	assert!(updated.response_created_at.is_some());
	// Default config leaves triage alone.
	assert_eq!(updated.status, ComplaintStatus::UnderChecking);

	let inbox = app.notifications.list_for_user(&sender).await.unwrap();
	assert!(
		inbox
			.iter()
			.any(|n| n.message.contains("A technician is on the way"))
	);
}

#[tokio::test]
async fn second_response_is_rejected_and_leaves_the_first_intact() {
	let app = test_app().await;
	student(&app, "ana@uni.edu").await;
	let acting = admin(&app, "boss@uni.edu").await;
	let id = submit(&app, "ana@uni.edu", Visibility::Public).await;

	app.complaints.respond(id, "first answer", &acting).await.unwrap();
	let err = app
		.complaints
		.respond(id, "second answer", &acting)
		.await
		.unwrap_err();
	assert!(matches!(err, Error::AlreadyResponded));

	let stored = app.store.get_complaint(id).await.unwrap().unwrap();
	assert_eq!(stored.response_message.as_deref(), Some("first answer"));
}

#[tokio::test]
async fn respond_distinguishes_missing_from_already_responded() {
	let app = test_app().await;
	let acting = admin(&app, "boss@uni.edu").await;

	let err = app
		.complaints
		.respond(Uuid::new_v4(), "answer", &acting)
		.await
		.unwrap_err();
	assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn respond_requires_admin_and_nonempty_message() {
	let app = test_app().await;
	let sender = student(&app, "ana@uni.edu").await;
	let acting = admin(&app, "boss@uni.edu").await;
	let id = submit(&app, "ana@uni.edu", Visibility::Public).await;

	let err = app.complaints.respond(id, "answer", &sender).await.unwrap_err();
	assert!(matches!(err, Error::Unauthorized));

	let err = app.complaints.respond(id, "   ", &acting).await.unwrap_err();
	assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn respond_marks_done_when_configured() {
	let config = Config {
		respond_marks_done: true,
		..Config::default()
	};
	let app = test_app_with(config).await;
	student(&app, "ana@uni.edu").await;
	let acting = admin(&app, "boss@uni.edu").await;
	let id = submit(&app, "ana@uni.edu", Visibility::Public).await;

	let updated = app.complaints.respond(id, "resolved", &acting).await.unwrap();
	assert_eq!(updated.status, ComplaintStatus::Done);
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn sender_listing_is_scoped_and_unknown_sender_is_empty() {
	let app = test_app().await;
	student(&app, "ana@uni.edu").await;
	student(&app, "ben@uni.edu").await;
	submit(&app, "ana@uni.edu", Visibility::Public).await;
	submit(&app, "ana@uni.edu", Visibility::Private).await;
	submit(&app, "ben@uni.edu", Visibility::Public).await;

	assert_eq!(app.complaints.list_by_sender("ana@uni.edu").await.unwrap().len(), 2);
	assert_eq!(app.complaints.list_by_sender("ben@uni.edu").await.unwrap().len(), 1);
	assert!(app.complaints.list_by_sender("ghost@uni.edu").await.unwrap().is_empty());
}

#[tokio::test]
async fn get_by_id_projects_and_unknown_id_is_not_found() {
	let app = test_app().await;
	student(&app, "ana@uni.edu").await;
	let id = submit(&app, "ana@uni.edu", Visibility::Public).await;

	let view = app.complaints.get_by_id(id).await.unwrap();
	assert_eq!(view.complaint_title, "Wifi down in dorm B");
	assert_eq!(view.student_email, "ana@uni.edu");

	let err = app.complaints.get_by_id(Uuid::new_v4()).await.unwrap_err();
	assert!(matches!(err, Error::NotFound(_)));
}
