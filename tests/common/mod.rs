//! In-process stand-ins for the portfolio API and the image host.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use actix_multipart::Multipart;
use actix_web::{dev::ServerHandle, web, App, HttpResponse, HttpServer};
use futures_util::StreamExt;
use serde_json::{json, Value};

use folio_studio::{ImageUploader, Resource, ResourceClient, ResourceScreen};

#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Clone, Debug, Default)]
pub struct ReceivedUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub file: Vec<u8>,
    pub upload_preset: Option<String>,
}

#[derive(Clone)]
struct Failure {
    method: Option<&'static str>,
    status: u16,
    body: Value,
}

#[derive(Default)]
pub struct MockState {
    documents: Mutex<HashMap<String, Value>>,
    requests: Mutex<Vec<Recorded>>,
    failure: Mutex<Option<Failure>>,
    uploads: Mutex<Vec<ReceivedUpload>>,
}

impl MockState {
    fn record(&self, method: &str, resource: &str, body: Option<Value>) {
        self.requests.lock().unwrap().push(Recorded {
            method: method.to_string(),
            path: format!("/api/{}", resource),
            body,
        });
    }

    fn forced_failure(&self, method: &str) -> Option<HttpResponse> {
        let failure = self.failure.lock().unwrap().clone()?;
        if failure.method.is_some_and(|only| only != method) {
            return None;
        }
        let status = actix_web::http::StatusCode::from_u16(failure.status).unwrap();
        Some(HttpResponse::build(status).json(failure.body))
    }
}

pub struct MockApi {
    pub base_url: String,
    state: Arc<MockState>,
    handle: ServerHandle,
}

impl MockApi {
    pub async fn start() -> MockApi {
        let state = Arc::new(MockState::default());
        let data = web::Data::from(state.clone());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .service(
                    web::resource("/api/{resource}")
                        .route(web::get().to(get_handler))
                        .route(web::post().to(create_handler))
                        .route(web::put().to(update_handler))
                        .route(web::delete().to(del_handler)),
                )
                .service(web::resource("/image/upload").route(web::post().to(upload_handler)))
                .service(
                    web::resource("/image/no-url").route(web::post().to(upload_without_url)),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind mock api");
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        MockApi {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    pub fn client<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient::with_client(&self.base_url, awc::Client::default())
    }

    pub fn screen<R: Resource>(&self) -> ResourceScreen<R> {
        ResourceScreen::new(self.client())
    }

    pub fn uploader(&self, preset: &str) -> ImageUploader {
        self.uploader_at("/image/upload", preset)
    }

    pub fn uploader_at(&self, path: &str, preset: &str) -> ImageUploader {
        ImageUploader::with_client(
            &format!("{}{}", self.base_url, path),
            preset,
            awc::Client::default(),
        )
    }

    pub fn seed(&self, path: &str, document: Value) {
        let resource = path.trim_start_matches("/api/").to_string();
        self.state
            .documents
            .lock()
            .unwrap()
            .insert(resource, document);
    }

    pub fn stored(&self, path: &str) -> Option<Value> {
        let resource = path.trim_start_matches("/api/");
        self.state.documents.lock().unwrap().get(resource).cloned()
    }

    /// Every API call answers with this status and body until cleared.
    pub fn fail_with(&self, status: u16, body: Value) {
        *self.state.failure.lock().unwrap() = Some(Failure {
            method: None,
            status,
            body,
        });
    }

    /// Like `fail_with`, but only for one HTTP method.
    pub fn fail_method(&self, method: &'static str, status: u16, body: Value) {
        *self.state.failure.lock().unwrap() = Some(Failure {
            method: Some(method),
            status,
            body,
        });
    }

    pub fn clear_failure(&self) {
        *self.state.failure.lock().unwrap() = None;
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_with(&self, method: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method)
            .collect()
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

fn not_found(resource: &str) -> HttpResponse {
    let mut name = resource.to_string();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    HttpResponse::NotFound().json(json!({ "error": format!("{} not found", name) }))
}

async fn get_handler(resource: web::Path<String>, state: web::Data<MockState>) -> HttpResponse {
    state.record("GET", &resource, None);
    if let Some(response) = state.forced_failure("GET") {
        return response;
    }
    match state.documents.lock().unwrap().get(resource.as_str()) {
        Some(document) => HttpResponse::Ok().json(document),
        None => not_found(&resource),
    }
}

async fn create_handler(
    resource: web::Path<String>,
    document: web::Json<Value>,
    state: web::Data<MockState>,
) -> HttpResponse {
    let document = document.into_inner();
    state.record("POST", &resource, Some(document.clone()));
    if let Some(response) = state.forced_failure("POST") {
        return response;
    }
    state
        .documents
        .lock()
        .unwrap()
        .insert(resource.into_inner(), document.clone());
    HttpResponse::Created().json(document)
}

async fn update_handler(
    resource: web::Path<String>,
    document: web::Json<Value>,
    state: web::Data<MockState>,
) -> HttpResponse {
    let document = document.into_inner();
    state.record("PUT", &resource, Some(document.clone()));
    if let Some(response) = state.forced_failure("PUT") {
        return response;
    }
    let mut documents = state.documents.lock().unwrap();
    match documents.get_mut(resource.as_str()) {
        Some(stored) => {
            *stored = document.clone();
            HttpResponse::Ok().json(document)
        }
        None => not_found(&resource),
    }
}

async fn del_handler(resource: web::Path<String>, state: web::Data<MockState>) -> HttpResponse {
    state.record("DELETE", &resource, None);
    if let Some(response) = state.forced_failure("DELETE") {
        return response;
    }
    match state.documents.lock().unwrap().remove(resource.as_str()) {
        Some(_) => HttpResponse::Ok().json(json!({ "message": "Deleted" })),
        None => not_found(&resource),
    }
}

async fn read_upload(mut payload: Multipart) -> ReceivedUpload {
    let mut upload = ReceivedUpload::default();
    while let Some(item) = payload.next().await {
        let mut field = item.expect("multipart field");
        let name = field.name().unwrap_or("").to_string();
        let file_name = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            data.extend_from_slice(&chunk.expect("multipart chunk"));
        }
        match name.as_str() {
            "file" => {
                upload.file_name = file_name;
                upload.content_type = content_type;
                upload.file = data;
            }
            "upload_preset" => {
                upload.upload_preset = Some(String::from_utf8_lossy(&data).to_string());
            }
            _ => {}
        }
    }
    upload
}

async fn upload_handler(payload: Multipart, state: web::Data<MockState>) -> HttpResponse {
    let upload = read_upload(payload).await;
    let preset = upload.upload_preset.clone();
    let file_name = upload.file_name.clone().unwrap_or_default();
    state.uploads.lock().unwrap().push(upload);

    if preset.as_deref() != Some("portfolio") {
        return HttpResponse::BadRequest()
            .json(json!({ "error": { "message": "Upload preset not found" } }));
    }
    HttpResponse::Ok().json(json!({
        "public_id": "v1/upload",
        "secure_url": format!("https://res.example.com/image/upload/{}", file_name)
    }))
}

async fn upload_without_url(payload: Multipart, state: web::Data<MockState>) -> HttpResponse {
    let upload = read_upload(payload).await;
    state.uploads.lock().unwrap().push(upload);
    HttpResponse::Ok().json(json!({ "public_id": "v1/upload" }))
}
