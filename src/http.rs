//! HTTP boundary.
//!
//! A thin hyper service that translates verbs and paths onto the service
//! operations and maps the error taxonomy onto status codes: 400 for
//! malformed input, 401 for failed credentials, 404 for missing entities,
//! 409 for registration and write-once conflicts, 500 for storage failures.
//! All domain rules live below this layer.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filestore::{FileStore, LocalFileStore};
use crate::hasher::Argon2Hasher;
use crate::models::{Attachment, User};
use crate::projection::{self, UserView};
use crate::service::{
	ComplaintService, IdentityService, NotificationService, SuggestionService,
};
use crate::store::Store;
use crate::types::Visibility;

/// The assembled application: one service per lifecycle plus the file store.
pub struct App {
	pub identity: IdentityService,
	pub complaints: ComplaintService,
	pub suggestions: SuggestionService,
	pub notifications: NotificationService,
	pub files: Arc<dyn FileStore>,
}

impl App {
	pub fn new(store: Store, config: Config) -> Self {
		let files = Arc::new(LocalFileStore::new(config.upload_dir.clone()));
		Self {
			identity: IdentityService::new(store.clone(), Arc::new(Argon2Hasher::new())),
			complaints: ComplaintService::new(store.clone(), config),
			suggestions: SuggestionService::new(store.clone()),
			notifications: NotificationService::new(store),
			files,
		}
	}

	/// Accept loop: one task per connection, HTTP/1.
	pub async fn serve(self: Arc<Self>, addr: SocketAddr) -> std::io::Result<()> {
		let listener = TcpListener::bind(addr).await?;
		info!(%addr, "listening");

		loop {
			let (stream, _peer) = listener.accept().await?;
			let app = self.clone();

			tokio::task::spawn(async move {
				let io = TokioIo::new(stream);
				let service = service_fn(move |req| {
					let app = app.clone();
					async move { Ok::<_, Infallible>(app.handle(req).await) }
				});
				if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
					error!(error = %err, "connection error");
				}
			});
		}
	}

	pub async fn handle(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
		let method = req.method().clone();
		let path = req.uri().path().to_string();
		let query = req.uri().query().map(str::to_string);

		match self.route(&method, &path, query.as_deref(), req).await {
			Ok(response) => response,
			Err(err) => error_response(&err),
		}
	}

	async fn route(
		&self,
		method: &Method,
		path: &str,
		query: Option<&str>,
		req: Request<Incoming>,
	) -> Result<Response<Full<Bytes>>> {
		let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

		match (method.as_str(), segments.as_slice()) {
			("POST", ["api", "users"]) => self.register(req).await,
			("POST", ["api", "login"]) => self.login(req).await,
			("GET", ["api", "users", email]) => self.get_user(email).await,
			("GET", ["api", "students"]) => self.list_students().await,
			("PUT", ["api", "students"]) => self.update_student(req).await,
			("DELETE", ["api", "students"]) => self.delete_student(req).await,

			("POST", ["api", "complaints"]) => self.submit_complaint(req).await,
			("GET", ["api", "complaints"]) => self.list_complaints_by_sender(query).await,
			("GET", ["api", "complaints", "all"]) => self.list_all_complaints().await,
			("GET", ["api", "complaints", id]) => {
				self.get_complaint(parse_id(id)?).await
			}
			("POST", ["api", "complaints", id, "status"]) => {
				self.set_complaint_status(parse_id(id)?, req).await
			}
			("POST", ["api", "complaints", id, "response"]) => {
				self.respond_complaint(parse_id(id)?, req).await
			}

			("POST", ["api", "suggestions"]) => self.submit_suggestion(req).await,
			("GET", ["api", "suggestions"]) => self.list_suggestions_by_owner(query).await,
			("GET", ["api", "suggestions", "all"]) => {
				self.list_all_suggestions(query).await
			}
			("GET", ["api", "suggestions", id]) => {
				self.get_suggestion(parse_id(id)?).await
			}
			("POST", ["api", "suggestions", id, "review"]) => {
				self.set_suggestion_review(parse_id(id)?, req).await
			}
			("POST", ["api", "suggestions", id, "response"]) => {
				self.respond_suggestion(parse_id(id)?, req).await
			}

			("GET", ["api", "notifications"]) => self.list_notifications(query).await,
			("POST", ["api", "notifications", id, "read"]) => {
				self.mark_notification_read(parse_id(id)?).await
			}

			_ => Err(Error::NotFound("route")),
		}
	}

	async fn register(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>> {
		let body: RegisterRequest = read_json(req).await?;
		let role = body.role.parse()?;
		let user = self
			.identity
			.register(&body.name, &body.email, &body.password, role)
			.await?;
		Ok(json_response(
			StatusCode::CREATED,
			&projection::user_view(&user),
		))
	}

	async fn login(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>> {
		let body: LoginRequest = read_json(req).await?;
		let user = self.identity.login(&body.email, &body.password).await?;
		Ok(json_response(
			StatusCode::OK,
			&json!({
				"message": "Login successful",
				"name": user.name,
				"role": user.role,
			}),
		))
	}

	async fn get_user(&self, email: &str) -> Result<Response<Full<Bytes>>> {
		let user = self
			.identity
			.find_by_email(email)
			.await?
			.ok_or(Error::NotFound("user"))?;
		Ok(json_response(
			StatusCode::OK,
			&json!({ "name": user.name, "email": user.email }),
		))
	}

	async fn list_students(&self) -> Result<Response<Full<Bytes>>> {
		let students: Vec<UserView> = self
			.identity
			.list_students()
			.await?
			.iter()
			.map(projection::user_view)
			.collect();
		Ok(json_response(StatusCode::OK, &students))
	}

	async fn update_student(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>> {
		let body: UpdateStudentRequest = read_json(req).await?;
		self.identity
			.update_student(
				&body.old_email,
				body.new_name.as_deref(),
				body.new_email.as_deref(),
				body.new_password.as_deref(),
			)
			.await?;
		Ok(success())
	}

	async fn delete_student(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>> {
		let body: DeleteStudentRequest = read_json(req).await?;
		self.identity.delete_user(&body.email).await?;
		Ok(success())
	}

	async fn submit_complaint(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>> {
		let body: SubmitComplaintRequest = read_json(req).await?;
		let attachment = self.store_attachment(body.attachment).await?;
		let complaint = self
			.complaints
			.submit(
				&body.student_email,
				body.complaint_type.parse()?,
				body.complaint_visibility.parse()?,
				&body.complaint_title,
				&body.complaint_message,
				attachment,
			)
			.await?;
		let view = self.complaints.get_by_id(complaint.id).await?;
		Ok(json_response(StatusCode::CREATED, &view))
	}

	async fn list_complaints_by_sender(
		&self,
		query: Option<&str>,
	) -> Result<Response<Full<Bytes>>> {
		let email = query_param(query, "sender_email")
			.ok_or_else(|| Error::InvalidInput("missing sender_email".into()))?;
		let views = self.complaints.list_by_sender(&email).await?;
		Ok(json_response(StatusCode::OK, &views))
	}

	async fn list_all_complaints(&self) -> Result<Response<Full<Bytes>>> {
		let views = self.complaints.list_all().await?;
		Ok(json_response(StatusCode::OK, &views))
	}

	async fn get_complaint(&self, id: Uuid) -> Result<Response<Full<Bytes>>> {
		let view = self.complaints.get_by_id(id).await?;
		Ok(json_response(StatusCode::OK, &view))
	}

	async fn set_complaint_status(
		&self,
		id: Uuid,
		req: Request<Incoming>,
	) -> Result<Response<Full<Bytes>>> {
		let body: StatusUpdateRequest = read_json(req).await?;
		let admin = self.acting_user(&body.admin_email).await?;
		let complaint = self.complaints.set_status(id, &body.new_status, &admin).await?;
		let view = self.complaints.get_by_id(complaint.id).await?;
		Ok(json_response(StatusCode::OK, &view))
	}

	async fn respond_complaint(
		&self,
		id: Uuid,
		req: Request<Incoming>,
	) -> Result<Response<Full<Bytes>>> {
		let body: RespondRequest = read_json(req).await?;
		let admin = self.acting_user(&body.admin_email).await?;
		let complaint = self
			.complaints
			.respond(id, &body.response_message, &admin)
			.await?;
		let view = self.complaints.get_by_id(complaint.id).await?;
		Ok(json_response(StatusCode::OK, &view))
	}

	async fn submit_suggestion(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>> {
		let body: SubmitSuggestionRequest = read_json(req).await?;
		let attachment = self.store_attachment(body.attachment).await?;
		let suggestion = self
			.suggestions
			.submit(
				&body.student_email,
				body.suggestion_type.parse()?,
				body.suggestion_visibility.parse()?,
				&body.suggestion_title,
				&body.suggestion_message,
				attachment,
			)
			.await?;
		let view = self.suggestions.get_by_id(suggestion.id).await?;
		Ok(json_response(StatusCode::CREATED, &view))
	}

	async fn list_suggestions_by_owner(
		&self,
		query: Option<&str>,
	) -> Result<Response<Full<Bytes>>> {
		let email = query_param(query, "owner_email")
			.ok_or_else(|| Error::InvalidInput("missing owner_email".into()))?;
		let views = self.suggestions.list_by_owner(&email).await?;
		Ok(json_response(StatusCode::OK, &views))
	}

	async fn list_all_suggestions(&self, query: Option<&str>) -> Result<Response<Full<Bytes>>> {
		let filter = match query_param(query, "visibility") {
			Some(raw) => Some(raw.parse::<Visibility>()?),
			None => None,
		};
		let views = self.suggestions.list_all(filter).await?;
		Ok(json_response(StatusCode::OK, &views))
	}

	async fn get_suggestion(&self, id: Uuid) -> Result<Response<Full<Bytes>>> {
		let view = self.suggestions.get_by_id(id).await?;
		Ok(json_response(StatusCode::OK, &view))
	}

	async fn set_suggestion_review(
		&self,
		id: Uuid,
		req: Request<Incoming>,
	) -> Result<Response<Full<Bytes>>> {
		let body: ReviewUpdateRequest = read_json(req).await?;
		self.suggestions.set_review_status(id, &body.new_status).await?;
		let view = self.suggestions.get_by_id(id).await?;
		Ok(json_response(StatusCode::OK, &view))
	}

	async fn respond_suggestion(
		&self,
		id: Uuid,
		req: Request<Incoming>,
	) -> Result<Response<Full<Bytes>>> {
		let body: SuggestionRespondRequest = read_json(req).await?;
		self.suggestions.respond(id, &body.response_message).await?;
		let view = self.suggestions.get_by_id(id).await?;
		Ok(json_response(StatusCode::OK, &view))
	}

	async fn list_notifications(&self, query: Option<&str>) -> Result<Response<Full<Bytes>>> {
		let email = query_param(query, "email")
			.ok_or_else(|| Error::InvalidInput("missing email".into()))?;
		let user = self
			.identity
			.find_by_email(&email)
			.await?
			.ok_or(Error::NotFound("user"))?;
		let views = self.notifications.list_for_user(&user).await?;
		Ok(json_response(StatusCode::OK, &views))
	}

	async fn mark_notification_read(&self, id: Uuid) -> Result<Response<Full<Bytes>>> {
		self.notifications.mark_read(id).await?;
		Ok(success())
	}

	/// Writes an uploaded attachment to the file store before any record
	/// references it. A missing attachment is simply `None`.
	async fn store_attachment(
		&self,
		upload: Option<AttachmentUpload>,
	) -> Result<Option<Attachment>> {
		let Some(upload) = upload else {
			return Ok(None);
		};
		let bytes = BASE64
			.decode(upload.content_base64.as_bytes())
			.map_err(|e| Error::InvalidInput(format!("invalid attachment encoding: {e}")))?;
		let attachment = self.files.put(&upload.file_name, &bytes).await?;
		Ok(Some(attachment))
	}

	async fn acting_user(&self, email: &str) -> Result<User> {
		self.identity
			.find_by_email(email)
			.await?
			.ok_or(Error::Unauthorized)
	}
}

// =============================================================================
// Request payloads
// =============================================================================

#[derive(Deserialize)]
struct RegisterRequest {
	name: String,
	email: String,
	password: String,
	role: String,
}

#[derive(Deserialize)]
struct LoginRequest {
	email: String,
	password: String,
}

#[derive(Deserialize)]
struct UpdateStudentRequest {
	old_email: String,
	new_name: Option<String>,
	new_email: Option<String>,
	new_password: Option<String>,
}

#[derive(Deserialize)]
struct DeleteStudentRequest {
	email: String,
}

#[derive(Deserialize)]
struct AttachmentUpload {
	file_name: String,
	content_base64: String,
}

#[derive(Deserialize)]
struct SubmitComplaintRequest {
	student_email: String,
	complaint_type: String,
	complaint_visibility: String,
	complaint_title: String,
	complaint_message: String,
	attachment: Option<AttachmentUpload>,
}

#[derive(Deserialize)]
struct SubmitSuggestionRequest {
	student_email: String,
	suggestion_type: String,
	suggestion_visibility: String,
	suggestion_title: String,
	suggestion_message: String,
	attachment: Option<AttachmentUpload>,
}

#[derive(Deserialize)]
struct StatusUpdateRequest {
	new_status: String,
	admin_email: String,
}

#[derive(Deserialize)]
struct RespondRequest {
	response_message: String,
	admin_email: String,
}

#[derive(Deserialize)]
struct ReviewUpdateRequest {
	new_status: String,
}

#[derive(Deserialize)]
struct SuggestionRespondRequest {
	response_message: String,
}

// =============================================================================
// Plumbing
// =============================================================================

async fn read_json<T: DeserializeOwned>(req: Request<Incoming>) -> Result<T> {
	let body = req
		.into_body()
		.collect()
		.await
		.map_err(|e| Error::InvalidInput(format!("unreadable body: {e}")))?
		.to_bytes();
	serde_json::from_slice(&body)
		.map_err(|e| Error::InvalidInput(format!("malformed JSON body: {e}")))
}

fn parse_id(segment: &str) -> Result<Uuid> {
	Uuid::parse_str(segment).map_err(|_| Error::InvalidInput(format!("invalid id: {segment}")))
}

fn query_param(query: Option<&str>, key: &str) -> Option<String> {
	query?
		.split('&')
		.filter_map(|pair| pair.split_once('='))
		.find(|(k, _)| *k == key)
		.map(|(_, v)| v.to_string())
}

fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
	let body = serde_json::to_vec(value).unwrap_or_default();
	let mut response = Response::new(Full::new(Bytes::from(body)));
	*response.status_mut() = status;
	response.headers_mut().insert(
		header::CONTENT_TYPE,
		HeaderValue::from_static("application/json"),
	);
	response
}

fn success() -> Response<Full<Bytes>> {
	json_response(StatusCode::OK, &json!({ "status": "success" }))
}

fn error_response(err: &Error) -> Response<Full<Bytes>> {
	let status = status_for(err);
	if status == StatusCode::INTERNAL_SERVER_ERROR {
		error!(error = %err, "request failed");
	}
	json_response(status, &json!({ "status": "fail", "message": err.to_string() }))
}

/// Error taxonomy → status code table.
pub fn status_for(err: &Error) -> StatusCode {
	match err {
		Error::NotFound(_) => StatusCode::NOT_FOUND,
		Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
		Error::DuplicateEmail | Error::AlreadyResponded => StatusCode::CONFLICT,
		Error::Unauthorized => StatusCode::UNAUTHORIZED,
		Error::Hash(_) | Error::Storage(_) | Error::FileStore(_) => {
			StatusCode::INTERNAL_SERVER_ERROR
		}
	}
}
